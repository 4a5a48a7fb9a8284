// Screening: the client state holder and its HTTP surface.
// Every model call goes through `scoring`; every write goes through `storage`.

pub mod handlers;
pub mod ingest;
pub mod session;

pub use session::{Session, SessionState};
