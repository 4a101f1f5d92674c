/// Immutable configuration snapshot read by the enforcement pass.
///
/// A value of this type is threaded explicitly through every rewrite call;
/// the pass never reads process-wide state, which keeps concurrent
/// preparation of independent plans trivially safe.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnforcerConfig {
    /// Partition count used for a new exchange when no existing child layout
    /// offers a reusable count.
    pub default_shuffle_partitions: usize,
    /// Whether later adaptive re-planning may further coalesce the exchanges
    /// this pass inserts. The rewrite itself is identical either way;
    /// downstream stages treat its decisions as provisional when set.
    pub adaptive_execution: bool,
}

impl Default for EnforcerConfig {
    fn default() -> Self {
        Self {
            default_shuffle_partitions: 200,
            adaptive_execution: false,
        }
    }
}

impl EnforcerConfig {
    pub fn with_default_partitions(default_shuffle_partitions: usize) -> Self {
        Self {
            default_shuffle_partitions,
            ..Self::default()
        }
    }
}
