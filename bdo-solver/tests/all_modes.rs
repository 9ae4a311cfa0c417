#![allow(unused_macros)]
use rstest_reuse::template;

// A testing "template" that runs a test once per allocation strategy

#[template]
#[rstest]
#[case::proportional(bdo_solver::AllocationMode::Proportional)]
#[case::need(bdo_solver::AllocationMode::Need)]
pub fn all_modes(#[case] mode: bdo_solver::AllocationMode) {}
