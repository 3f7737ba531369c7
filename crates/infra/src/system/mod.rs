use chrono::Utc;

/// Source of the current time. Every dispatch cycle reads "now" through this
/// trait so that reminder windows can be evaluated at fixed instants in tests.
pub trait ISys: Send + Sync {
    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
}

/// Reads the wall clock, used outside of tests
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock frozen at the given timestamp in millis
pub struct StaticSys(pub i64);
impl ISys for StaticSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.0
    }
}
