use credit_core::{CreditRatios, FinancialQuantities};

/// Flat tax rate used by the EBIT-based free cash flow estimate
pub const ASSUMED_TAX_RATE: f64 = 0.25;

/// Value stored for a ratio whose denominator is zero
pub const UNDEFINED: f64 = f64::INFINITY;

/// Free cash flow, estimated from EBIT when operating cash flow is unreported.
pub fn free_cash_flow(q: &FinancialQuantities) -> f64 {
    if q.operating_cash_flow == 0.0 && q.ebit != 0.0 {
        q.ebit * (1.0 - ASSUMED_TAX_RATE) - q.capex - q.change_in_working_capital
    } else {
        q.operating_cash_flow - q.capex
    }
}

fn fcf_to_debt(fcf: f64, total_debt: f64) -> f64 {
    if total_debt > 0.0 {
        fcf / total_debt
    } else {
        UNDEFINED
    }
}

fn debt_to_ebitda(total_debt: f64, ebitda: f64) -> f64 {
    if ebitda != 0.0 {
        total_debt / ebitda
    } else {
        UNDEFINED
    }
}

fn interest_coverage(ebit: f64, interest_expense: f64) -> f64 {
    if interest_expense != 0.0 {
        ebit / interest_expense.abs()
    } else {
        UNDEFINED
    }
}

/// Operating cash flow over interest plus short-term debt (a proxy for
/// current maturities).
fn dscr(operating_cash_flow: f64, interest_expense: f64, short_term_debt: f64) -> f64 {
    let denominator = interest_expense.abs() + short_term_debt;
    if denominator > 0.0 {
        operating_cash_flow / denominator
    } else {
        UNDEFINED
    }
}

pub fn compute_ratios(q: &FinancialQuantities) -> CreditRatios {
    let fcf = free_cash_flow(q);

    CreditRatios {
        fcf,
        fcf_to_debt: fcf_to_debt(fcf, q.total_debt),
        debt_to_ebitda: debt_to_ebitda(q.total_debt, q.ebitda),
        interest_coverage: interest_coverage(q.ebit, q.interest_expense),
        dscr: dscr(q.operating_cash_flow, q.interest_expense, q.short_term_debt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quantities() -> FinancialQuantities {
        FinancialQuantities {
            ticker: "TEST".to_string(),
            company_name: "Test Co".to_string(),
            fiscal_year: "2024".to_string(),
            revenue: 100e9,
            ebitda: 30e9,
            ebit: 25e9,
            interest_expense: 2e9,
            operating_cash_flow: 20e9,
            capex: 5e9,
            change_in_working_capital: 0.0,
            short_term_debt: 3e9,
            long_term_debt: 10e9,
            total_debt: 13e9,
        }
    }

    #[test]
    fn test_reference_company_ratios() {
        let r = compute_ratios(&quantities());
        assert_relative_eq!(r.fcf, 15e9);
        assert_relative_eq!(r.fcf_to_debt, 15.0 / 13.0, epsilon = 1e-12);
        assert_relative_eq!(r.debt_to_ebitda, 13.0 / 30.0, epsilon = 1e-12);
        assert_relative_eq!(r.interest_coverage, 12.5);
        assert_relative_eq!(r.dscr, 4.0);
    }

    #[test]
    fn test_fcf_fallback_from_ebit() {
        let q = FinancialQuantities {
            operating_cash_flow: 0.0,
            ebit: 10e9,
            capex: 1e9,
            change_in_working_capital: 0.5e9,
            ..quantities()
        };
        assert_relative_eq!(free_cash_flow(&q), 6e9);
    }

    #[test]
    fn test_fcf_without_ocf_or_ebit() {
        let q = FinancialQuantities {
            operating_cash_flow: 0.0,
            ebit: 0.0,
            capex: 1e9,
            ..quantities()
        };
        assert_relative_eq!(free_cash_flow(&q), -1e9);
    }

    #[test]
    fn test_zero_denominators_are_undefined() {
        let q = FinancialQuantities {
            ebitda: 0.0,
            interest_expense: 0.0,
            short_term_debt: 0.0,
            long_term_debt: 0.0,
            total_debt: 0.0,
            ..quantities()
        };
        let r = compute_ratios(&q);
        assert_eq!(r.fcf_to_debt, f64::INFINITY);
        assert_eq!(r.debt_to_ebitda, f64::INFINITY);
        assert_eq!(r.interest_coverage, f64::INFINITY);
        assert_eq!(r.dscr, f64::INFINITY);
    }

    #[test]
    fn test_negative_interest_expense_uses_magnitude() {
        let q = FinancialQuantities {
            interest_expense: -2e9,
            ..quantities()
        };
        let r = compute_ratios(&q);
        assert_relative_eq!(r.interest_coverage, 12.5);
        assert_relative_eq!(r.dscr, 4.0);
    }

    #[test]
    fn test_negative_ebitda_gives_negative_leverage() {
        let q = FinancialQuantities {
            ebitda: -13e9,
            ..quantities()
        };
        assert_relative_eq!(compute_ratios(&q).debt_to_ebitda, -1.0);
    }
}
