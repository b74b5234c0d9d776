//! Process-wide knowledge of who is signed in.
//!
//! The [SessionProvider] is mounted once when the server starts. It resolves
//! the existing session, follows the auth service's events and publishes the
//! result as a [SessionState] that handlers read or wait on.

mod provider;
mod state;

pub use provider::SessionProvider;
pub use state::SessionState;
