//! Scenario bindings for the `graft-syntax` BDD feature file.
//!
//! These functions bind Gherkin scenario names to the step definitions in the
//! parent module.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::scenario;

use super::TestWorld;

/// Fixture providing the shared BDD world.
#[fixture]
fn world() -> RefCell<TestWorld> {
    super::world()
}

#[scenario(
    path = "tests/features/graft_syntax.feature",
    name = "Expression rule rewrites every occurrence"
)]
fn expression_rule(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/graft_syntax.feature",
    name = "Statement rule swaps destructured values"
)]
fn statement_rule(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/graft_syntax.feature",
    name = "Empty replacement deletes statements"
)]
fn deletion_rule(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/graft_syntax.feature",
    name = "Source without matches is only reformatted"
)]
fn reformat_only(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/graft_syntax.feature",
    name = "TypeScript expression rule"
)]
fn typescript_rule(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/graft_syntax.feature",
    name = "Replacement with an unknown capture is rejected"
)]
fn unknown_capture(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/graft_syntax.feature",
    name = "Lone capture pattern is rejected"
)]
fn lone_capture(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/graft_syntax.feature",
    name = "Broken source is rejected"
)]
fn broken_source(world: RefCell<TestWorld>) {
    drop(world);
}
