use credit_core::{CreditMetrics, CreditRatios, FinancialQuantities, RiskBucket, SubScores};

/// Lower leverage is better. Non-positive leverage (no debt, or negative
/// EBITDA) and undefined leverage (zero EBITDA) both score best.
pub fn debt_to_ebitda_score(d_e: f64) -> u8 {
    // `< 2.0` already covers the non-positive case
    if d_e == f64::INFINITY || d_e < 2.0 {
        5
    } else if d_e < 3.0 {
        4
    } else if d_e < 4.0 {
        3
    } else if d_e < 5.0 {
        2
    } else {
        1
    }
}

pub fn interest_coverage_score(ic: f64) -> u8 {
    if ic > 8.0 {
        5
    } else if ic > 5.0 {
        4
    } else if ic > 3.0 {
        3
    } else if ic > 1.5 {
        2
    } else {
        1
    }
}

pub fn dscr_score(dscr: f64) -> u8 {
    if dscr > 1.8 {
        5
    } else if dscr > 1.4 {
        4
    } else if dscr > 1.1 {
        3
    } else if dscr > 1.0 {
        2
    } else {
        1
    }
}

pub fn fcf_to_debt_score(fcf_d: f64) -> u8 {
    if fcf_d > 0.25 {
        5
    } else if fcf_d > 0.15 {
        4
    } else if fcf_d > 0.08 {
        3
    } else if fcf_d > 0.03 {
        2
    } else {
        1
    }
}

pub fn score_ratios(ratios: &CreditRatios) -> SubScores {
    SubScores {
        debt_to_ebitda: debt_to_ebitda_score(ratios.debt_to_ebitda),
        interest_coverage: interest_coverage_score(ratios.interest_coverage),
        dscr: dscr_score(ratios.dscr),
        fcf_to_debt: fcf_to_debt_score(ratios.fcf_to_debt),
    }
}

/// Final stage of the pipeline: attach sub-scores, composite and bucket.
pub fn score_metrics(quantities: FinancialQuantities, ratios: CreditRatios) -> CreditMetrics {
    let sub_scores = score_ratios(&ratios);
    let score = sub_scores.total();

    CreditMetrics {
        quantities,
        ratios,
        sub_scores,
        score,
        rating_bucket: RiskBucket::from_score(score),
    }
}
