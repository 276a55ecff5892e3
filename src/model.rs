use crate::error::ModelError;
use crate::genome::Genome;
use crate::placement::Placement;
use std::collections::BTreeSet;

/// Creates and releases the visual representation of creatures.
///
/// The population never inspects a handle; it only hands it back for release
/// at the moment the creature leaves the population.
pub trait ModelFactory {
    type Handle;

    fn create_visual(
        &mut self,
        genome: &Genome,
        placement: &Placement,
    ) -> Result<Self::Handle, ModelError>;

    fn destroy_visual(&mut self, handle: Self::Handle) -> Result<(), ModelError>;
}

/// Handle bookkeeping without any rendering, for headless hosts
#[derive(Debug, Default)]
pub struct InMemoryModelFactory {
    next: u64,
    live: BTreeSet<u64>,
    destroyed: usize,
}

impl InMemoryModelFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }
}

impl ModelFactory for InMemoryModelFactory {
    type Handle = u64;

    fn create_visual(
        &mut self,
        _genome: &Genome,
        _placement: &Placement,
    ) -> Result<u64, ModelError> {
        let handle = self.next;
        self.next += 1;
        self.live.insert(handle);
        Ok(handle)
    }

    fn destroy_visual(&mut self, handle: u64) -> Result<(), ModelError> {
        if !self.live.remove(&handle) {
            return Err(ModelError::StaleHandle);
        }
        self.destroyed += 1;
        Ok(())
    }
}
