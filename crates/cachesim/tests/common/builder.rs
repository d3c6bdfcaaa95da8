use cachesim_core::AccessRecord;

/// Builds a trace one access at a time.
#[derive(Debug, Default)]
pub struct TraceBuilder {
    records: Vec<AccessRecord>,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(mut self, address: u32) -> Self {
        self.records.push(AccessRecord::read(address));
        self
    }

    pub fn write(mut self, address: u32) -> Self {
        self.records.push(AccessRecord::write(address));
        self
    }

    pub fn fetch(mut self, address: u32) -> Self {
        self.records.push(AccessRecord::fetch(address));
        self
    }

    /// Reads every address of `addresses` in order.
    pub fn reads(self, addresses: impl IntoIterator<Item = u32>) -> Self {
        addresses.into_iter().fold(self, Self::read)
    }

    /// Writes every address of `addresses` in order.
    pub fn writes(self, addresses: impl IntoIterator<Item = u32>) -> Self {
        addresses.into_iter().fold(self, Self::write)
    }

    /// Fetches every address of `addresses` in order.
    pub fn fetches(self, addresses: impl IntoIterator<Item = u32>) -> Self {
        addresses.into_iter().fold(self, Self::fetch)
    }

    pub fn build(self) -> Vec<AccessRecord> {
        self.records
    }

    /// Renders the trace in the on-disk `<kind> <hexAddress>` format.
    pub fn to_text(&self) -> String {
        self.records.iter().map(|r| format!("{r}\n")).collect()
    }
}
