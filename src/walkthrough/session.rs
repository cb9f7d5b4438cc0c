use tracing::{debug, info, trace};

use crate::network::{NetworkState, StateError, Topology};
use crate::walkthrough::highlight::{self, Highlight};
use crate::walkthrough::navigation::Navigator;
use crate::walkthrough::sequence::StepSequence;
use crate::walkthrough::step::{Step, StepOutput};

/// One live walkthrough: the network state, the steps, and the cursor.
///
/// Moving forward runs the new step against the shared state, so values
/// accumulate in visiting order. Moving back recomputes the displayed result
/// on a scratch copy and leaves the shared values alone.
#[derive(Clone, Debug)]
pub struct Session {
    topology: Topology,
    initial: NetworkState,
    state: NetworkState,
    steps: StepSequence,
    nav: Navigator,
    output: StepOutput,
}

impl Session {
    pub fn new(
        topology: Topology,
        state: NetworkState,
        steps: StepSequence,
    ) -> Result<Self, StateError> {
        let nav = Navigator::new(steps.len());
        let mut working = state.clone();
        let output = steps.step(0).calculate(&topology, &mut working)?;
        info!(steps = steps.len(), "walkthrough session started");
        Ok(Self {
            topology,
            initial: state,
            state: working,
            steps,
            nav,
            output,
        })
    }

    pub fn standard(state: NetworkState) -> Result<Self, StateError> {
        let topology = Topology::two_two_two();
        let steps = StepSequence::standard(&topology);
        Self::new(topology, state, steps)
    }

    pub fn advance(&mut self) -> Result<bool, StateError> {
        if !self.nav.next() {
            trace!(index = self.nav.current(), "advance ignored at last step");
            return Ok(false);
        }
        let step = self.steps.step(self.nav.current());
        self.output = step.calculate(&self.topology, &mut self.state)?;
        debug!(index = self.nav.current(), title = %step.title, "advanced");
        Ok(true)
    }

    pub fn retreat(&mut self) -> Result<bool, StateError> {
        if !self.nav.prev() {
            trace!("retreat ignored at first step");
            return Ok(false);
        }
        let step = self.steps.step(self.nav.current());
        let mut scratch = self.state.clone();
        self.output = step.calculate(&self.topology, &mut scratch)?;
        debug!(index = self.nav.current(), title = %step.title, "retreated");
        Ok(true)
    }

    /// Moves to `index` (clamped to the last step). Forward moves replay
    /// every step in between so each one sees its predecessors' values.
    pub fn advance_to(&mut self, index: usize) -> Result<(), StateError> {
        let target = index.min(self.nav.total() - 1);
        while self.nav.current() < target {
            self.advance()?;
        }
        while self.nav.current() > target {
            self.retreat()?;
        }
        Ok(())
    }

    /// Throws away every calculated value and starts over at the first step.
    pub fn restart(&mut self) -> Result<(), StateError> {
        *self = Self::new(
            self.topology.clone(),
            self.initial.clone(),
            self.steps.clone(),
        )?;
        Ok(())
    }

    pub fn current_index(&self) -> usize {
        self.nav.current()
    }

    pub fn total_steps(&self) -> usize {
        self.nav.total()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn current_step(&self) -> &Step {
        self.steps.step(self.nav.current())
    }

    pub fn output(&self) -> &StepOutput {
        &self.output
    }

    pub fn highlight(&self) -> &Highlight {
        highlight::resolve(self.current_step())
    }

    pub fn state(&self) -> &NetworkState {
        &self.state
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn steps(&self) -> &StepSequence {
        &self.steps
    }
}
