pub mod commit;
#[cfg(test)]
pub(crate) mod testing;

pub use commit::Commit;
pub use commit::CommitLogReader;
pub use commit::GitLogReader;
pub use commit::LogRequest;
