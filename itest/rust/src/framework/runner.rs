/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use gdbind::builtin::VariantArray;
use gdbind::classes::Node;
use gdbind::obj::Gd;
use gdbind::register::{godot_api, GodotClass};

use crate::framework::{CaseMode, ItestCase, Selection, TestContext};

/// Runs all `#[itest]` cases when invoked from `TestRunner.gd`.
#[derive(GodotClass)]
#[class(init)]
pub struct IntegrationTests {
    suites: BTreeMap<&'static str, SuiteTally>,
    failures: Vec<String>,
}

#[derive(Default, Copy, Clone)]
struct SuiteTally {
    passed: u32,
    failed: u32,
    skipped: u32,
}

impl SuiteTally {
    fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Pass => self.passed += 1,
            Verdict::Fail => self.failed += 1,
            Verdict::Skip => self.skipped += 1,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            passed: self.passed + other.passed,
            failed: self.failed + other.failed,
            skipped: self.skipped + other.skipped,
        }
    }

    fn ran(&self) -> u32 {
        self.passed + self.failed
    }
}

#[godot_api]
impl IntegrationTests {
    /// Returns `true` when at least one case ran and none failed.
    #[func]
    fn run_all_tests(&mut self, scene_tree: Gd<Node>, allow_focus: bool, filters: VariantArray) -> bool {
        let filters: Vec<String> = filters.iter_shared().map(|v| v.to::<String>()).collect();
        let selection = Selection::collect(&filters);

        println!(
            "{BOLD}gdbind itest{RESET}: {} cases selected{}",
            selection.cases.len(),
            if selection.focused { " (focus)" } else { "" }
        );

        let started = Instant::now();
        let ctx = TestContext { scene_tree };
        let mut current_group = "";
        for case in &selection.cases {
            if case.group() != current_group {
                current_group = case.group();
                println!("\n  [{}] {}", case.suite(), current_group);
            }
            self.run_case(case, &ctx);
        }

        let overall = self.print_summary(started.elapsed().as_secs_f64());
        if selection.focused && !allow_focus {
            println!("{YELLOW}Focused cases present, but focus is disallowed in this run.{RESET}");
            return false;
        }
        overall
    }

    fn run_case(&mut self, case: &ItestCase, ctx: &TestContext) {
        print!("    {} ... ", case.name);
        gdbind::private::flush_stdout();

        let verdict = if case.mode == CaseMode::Skip {
            Verdict::Skip
        } else {
            let run = case.run;
            let outcome = gdbind::private::handle_panic(
                || format!("itest {}::{} (line {})", case.module, case.name, case.line),
                std::panic::AssertUnwindSafe(move || run(ctx)),
            );
            match outcome {
                Ok(()) => Verdict::Pass,
                Err(_) => Verdict::Fail,
            }
        };

        if verdict == Verdict::Fail {
            // The panic report went to stderr in between; repeat the case name.
            println!("    {} ... {verdict}", case.name);
            self.failures.push(format!("{}::{}", case.group(), case.name));
        } else {
            println!("{verdict}");
        }

        self.suites.entry(case.suite()).or_default().record(verdict);
    }

    fn print_summary(&self, seconds: f64) -> bool {
        println!("\n{BOLD}Summary{RESET} ({seconds:.2}s)");

        let mut total = SuiteTally::default();
        for (suite, tally) in &self.suites {
            println!(
                "  {suite:<18} {:>4} passed {:>4} failed {:>4} skipped",
                tally.passed, tally.failed, tally.skipped
            );
            total = total.merge(*tally);
        }

        for name in &self.failures {
            println!("  {RED}failed{RESET}: {name}");
        }

        // An empty run usually means the library did not load its tests.
        let success = total.failed == 0 && total.ran() > 0;
        let verdict = if success { Verdict::Pass } else { Verdict::Fail };
        println!("Result: {verdict}");
        success
    }
}

#[derive(Copy, Clone, Eq, PartialEq)]
enum Verdict {
    Pass,
    Fail,
    Skip,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (color, word) = match self {
            Verdict::Pass => (GREEN, "ok"),
            Verdict::Fail => (RED, "FAILED"),
            Verdict::Skip => (YELLOW, "skipped"),
        };
        write!(f, "{color}{word}{RESET}")
    }
}

const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";
