//! Census label normalization.
//!
//! Census table labels such as
//! `Estimate!!Total!!Total population!!SELECTED AGE CATEGORIES!!18 years and over`
//! are rewritten into compact column codes by applying a fixed list of
//! literal substring replacements in order. Each rule sees the output of the
//! previous one, so more specific patterns are listed before the generic
//! patterns they contain.

/// Ordered `(pattern, replacement)` rules.
pub const REPLACEMENTS: &[(&str, &str)] = &[
    ("!!", "_"),
    (" ", "_"),
    ("Total_Margin_of_Error_population", "MOE_POP"),
    ("Total_", "T_"),
    ("Estimate", "EST"),
    ("Margin_of_Error_population", "MOE_POP"),
    ("Estimate_Percent", "EPER"),
    ("Estimate_population", "EPOP"),
    ("Margin_of_Error_Percent_population", "MOE_PER"),
    ("SUMMARY_INDICATORS", "SUM"),
    ("Margin_of_Error", "MOE"),
    ("years_and_over", "YO"),
    ("SELECTED_AGE_CATEGORIES", "YO"),
    ("population", "POP"),
    ("American_Indian_and_Alaska_Native", "AI"),
    ("Native_Hawaiian_and_Other_Pacific_Islander", "PI"),
    ("Two_or_more_races", "TWO+"),
    ("Black_or_African_American", "AA"),
    (
        "Race_alone_or_in_combination_with_one_or_more_other_races",
        "RACE_ALONE_POS",
    ),
    ("Two_races_including_Some_other_race", "INC_OTH"),
    ("Two_races_excluding_Some_other_race", "EXC_OTH"),
    ("Hispanic_or_Latino", "HIS"),
    ("HISPANIC_OR_LATINO", "HIS"),
    ("and_Three_or_more_races", "3+"),
    ("VOTING_AGE_POPULATION_Citizen", "VOTE"),
    ("males_per_100_females", "MP100F"),
];

/// Rewrite a raw census label into its compact column code.
///
/// A label that matches no rule is returned unchanged.
///
/// ```
/// use pol_map::normalize_label;
///
/// assert_eq!(normalize_label("!!Total_Margin_of_Error_population"), "_MOE_POP");
/// assert_eq!(normalize_label("Geography"), "Geography");
/// ```
pub fn normalize_label(label: &str) -> String {
    REPLACEMENTS
        .iter()
        .fold(label.to_string(), |acc, (pattern, replacement)| {
            if acc.contains(pattern) {
                acc.replace(pattern, replacement)
            } else {
                acc
            }
        })
}
