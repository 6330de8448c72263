//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible session states during
//! development. These checks are compiled out in release builds.

use crate::session::RaceSession;

/// Validate that a session's state is internally consistent
pub fn assert_session_invariants(session: &RaceSession) {
    // A rolled seed always has a value and flags
    debug_assert!(
        !session.seed_rolled() || session.seed().is_some(),
        "Session {} is rolled but has no seed",
        session.session_id()
    );
    debug_assert!(
        !session.seed_rolled() || !session.flag_string().is_empty(),
        "Session {} is rolled but has no flags",
        session.session_id()
    );

    // The room shows our info line exactly while a seed is rolled
    debug_assert!(
        session.seed_rolled() == session.info_published(),
        "Session {} rolled={} but info_published={}",
        session.session_id(),
        session.seed_rolled(),
        session.info_published()
    );

    if let Some(version) = session.race_version() {
        debug_assert!(
            version.as_str().starts_with('v'),
            "Session {} has version {} without v prefix",
            session.session_id(),
            version
        );
    }
}
