/// Upper bound on the number of lock shards
pub const MAX_SHARD_AMOUNT: usize = 1024;

/// Upper bound on the number of entries pre-allocated at construction
pub const MAX_INITIAL_CAPACITY: usize = 1 << 20;

/// Construction options for a [`KeyValueStore`](crate::KeyValueStore)
///
/// # Example
///
/// ```rust
/// use storage_core::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_initial_capacity(4096)
///     .with_shard_amount(32);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of entries to pre-allocate room for (default: 0)
    pub initial_capacity: usize,
    /// Number of lock shards, always a power of two above 1 when set.
    /// `None` keeps the map's own default (scaled to the CPU count).
    pub shard_amount: Option<usize>,
}

impl StoreConfig {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of entries to pre-allocate room for
    ///
    /// Capped at [`MAX_INITIAL_CAPACITY`]; the map still grows past it on demand.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity.min(MAX_INITIAL_CAPACITY);
        self
    }

    /// Sets the number of lock shards
    ///
    /// More shards reduce contention between writers touching different keys.
    /// The value is clamped to `2..=MAX_SHARD_AMOUNT` and rounded up to the
    /// next power of two.
    ///
    /// # Example
    ///
    /// ```rust
    /// use storage_core::StoreConfig;
    ///
    /// let config = StoreConfig::default().with_shard_amount(12);
    /// assert_eq!(config.shard_amount, Some(16));
    /// ```
    pub fn with_shard_amount(mut self, shards: usize) -> Self {
        self.shard_amount = Some(normalize_shard_amount(shards));
        self
    }
}

/// Clamps a shard count into the range the map accepts
pub(crate) fn normalize_shard_amount(shards: usize) -> usize {
    // MAX_SHARD_AMOUNT is a power of two, so rounding up cannot exceed it
    shards.clamp(2, MAX_SHARD_AMOUNT).next_power_of_two()
}
