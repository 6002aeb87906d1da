//! Test-only crate — see `tests/` for the end-to-end suites.
