use cachesim_core::cache::{Block, SetAssocStore};
use cachesim_core::hierarchy::AccessOutcome;
use cachesim_core::{AccessRecord, HierarchyConfig, MemoryHierarchy, Protocol};
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Returns the block holding `address` in `store`, without touching recency.
pub fn block_at(store: &SetAssocStore, address: u32) -> Option<Block> {
    let (index, tag) = store.geometry().decode(address);
    store.set_blocks(index).find(|block| block.tag == tag)
}

/// A hierarchy under test; every access is followed by an invariant check.
#[derive(Debug)]
pub struct TestContext {
    pub hierarchy: MemoryHierarchy,
}

impl TestContext {
    pub fn new(config: &HierarchyConfig) -> Self {
        init_tracing();
        let hierarchy = MemoryHierarchy::new(config).unwrap();
        Self { hierarchy }
    }

    /// `l1_size`-byte L1s with the standard 16 KiB 8-way L2.
    pub fn with_l1(l1_size: usize, block: usize, ways: usize, protocol: Protocol) -> Self {
        Self::new(&HierarchyConfig::new(l1_size, block, ways, protocol))
    }

    pub fn access(&mut self, record: AccessRecord) -> AccessOutcome {
        let outcome = self.hierarchy.access(record);
        self.hierarchy.verify_invariants().unwrap();
        outcome
    }

    pub fn read(&mut self, address: u32) -> AccessOutcome {
        self.access(AccessRecord::read(address))
    }

    pub fn write(&mut self, address: u32) -> AccessOutcome {
        self.access(AccessRecord::write(address))
    }

    pub fn fetch(&mut self, address: u32) -> AccessOutcome {
        self.access(AccessRecord::fetch(address))
    }

    pub fn replay(&mut self, records: &[AccessRecord]) {
        for &record in records {
            let _ = self.access(record);
        }
    }

    pub fn l1i(&self, address: u32) -> Option<Block> {
        block_at(self.hierarchy.l1_instruction(), address)
    }

    pub fn l1d(&self, address: u32) -> Option<Block> {
        block_at(self.hierarchy.l1_data(), address)
    }

    pub fn l2(&self, address: u32) -> Option<Block> {
        block_at(self.hierarchy.l2(), address)
    }
}
