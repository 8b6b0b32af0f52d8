/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::any::Any;
use std::panic;

use gdbind::classes::Node;
use gdbind::obj::Gd;
use gdbind::sys;

mod runner;

pub use gdbind::test::itest;
pub use runner::IntegrationTests;

sys::plugin_registry!(pub(crate) __GDBIND_ITEST_CASES: ItestCase);

/// Passed to tests that declare a `&TestContext` parameter.
#[derive(Clone)]
pub struct TestContext {
    /// Node inside the running scene tree; children added to it receive tree notifications.
    pub scene_tree: Gd<Node>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CaseMode {
    Run,
    Skip,
    Focus,
}

/// One `#[itest]` function, as registered by the macro.
#[derive(Copy, Clone)]
pub struct ItestCase {
    pub name: &'static str,
    /// `module_path!()` of the test, e.g. `itest::engine_tests::sky_test`.
    pub module: &'static str,
    pub line: u32,
    pub mode: CaseMode,
    pub run: fn(&TestContext),
}

impl ItestCase {
    /// Top-level test module, e.g. `engine_tests`.
    pub fn suite(&self) -> &'static str {
        self.module.split("::").nth(1).unwrap_or(self.module)
    }

    /// Innermost module, e.g. `sky_test`.
    pub fn group(&self) -> &'static str {
        self.module.rsplit("::").next().unwrap_or(self.module)
    }

    fn matches(&self, filters: &[String]) -> bool {
        filters.is_empty()
            || filters
                .iter()
                .any(|f| self.name.contains(f.as_str()) || self.module.contains(f.as_str()))
    }
}

/// Selected cases, ordered by module and then by source line.
pub(crate) struct Selection {
    pub cases: Vec<ItestCase>,
    pub focused: bool,
}

impl Selection {
    pub fn collect(filters: &[String]) -> Self {
        let mut all = Vec::new();
        sys::plugin_foreach!(__GDBIND_ITEST_CASES; |case: &ItestCase| all.push(*case));

        let focused = all.iter().any(|c| c.mode == CaseMode::Focus);
        let mut cases: Vec<ItestCase> = all
            .into_iter()
            .filter(|c| !focused || c.mode == CaseMode::Focus)
            .filter(|c| c.matches(filters))
            .collect();

        cases.sort_by(|a, b| (a.module, a.line).cmp(&(b.module, b.line)));
        Self { cases, focused }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Panic helpers

/// Runs `code` with the panic hook silenced, returning the panic payload if there was one.
pub fn catch_quiet(code: impl FnOnce()) -> Result<(), Box<dyn Any + Send>> {
    let hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));

    // Tests only touch their own objects.
    let result = panic::catch_unwind(panic::AssertUnwindSafe(code));

    panic::set_hook(hook);
    result
}

pub fn expect_panic(context: &str, code: impl FnOnce()) {
    if catch_quiet(code).is_ok() {
        panic!("expected a panic: {context}");
    }
}

/// Like [`expect_panic`], but also requires that the panic message contains every string in `needles`.
pub fn expect_panic_containing(context: &str, needles: &[&str], code: impl FnOnce()) {
    let payload = match catch_quiet(code) {
        Ok(()) => panic!("expected a panic: {context}"),
        Err(payload) => payload,
    };

    let message = gdbind::private::extract_panic_message(payload.as_ref());
    for needle in needles {
        assert!(
            message.contains(needle),
            "{context}: panic message lacks `{needle}`:\n{message}"
        );
    }
}
