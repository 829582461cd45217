// src/catalog.rs

use std::collections::BTreeMap;

/// Size of the fixed curriculum catalog. Module ids run 1..=MODULE_COUNT.
pub const MODULE_COUNT: i64 = 15;

/// Returns the fixed mapping of module id to human-readable title.
/// Pure static data; no store access.
pub fn module_titles() -> BTreeMap<i64, &'static str> {
    BTreeMap::from([
        (1, "Introduction & Fundamental Principles of IFRS 17"),
        (2, "Combination and Separation of Insurance Contracts"),
        (3, "Level of Aggregation"),
        (4, "General Measurement Model (GMM)"),
        (5, "Premium Allocation Approach (PAA)"),
        (6, "Variable Fee Approach (VFA)"),
        (7, "Contractual Service Margin (CSM)"),
        (8, "Risk Adjustment"),
        (9, "Discount Rates and Time Value of Money"),
        (10, "Initial Recognition and Measurement"),
        (11, "Subsequent Measurement"),
        (12, "Presentation and Disclosure"),
        (13, "Transition Requirements"),
        (14, "Implementation Challenges"),
        (15, "Case Studies and Practical Applications"),
    ])
}

/// True if `module_id` refers to a module in the catalog.
pub fn is_valid_module(module_id: i64) -> bool {
    (1..=MODULE_COUNT).contains(&module_id)
}
