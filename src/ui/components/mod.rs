pub mod help;
pub mod network_diagram;
pub mod progress_bar;
pub mod stepper_pane;
