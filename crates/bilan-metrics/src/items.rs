//! Standard line-item queries.
//!
//! Names cover the spellings of the common providers: Yahoo-style display
//! names (`"Total Revenue"`), FMP field names (`"revenue"`), and the variants
//! seen in older statement dumps. Fill values follow the convention that a
//! missing additive item (debt, cash, interest) is zero, while a missing
//! denominator is flagged by the profitability engine as unavailable.

use crate::resolve::LineItemQuery;

/// Net income attributable to common shareholders.
pub const NET_INCOME: LineItemQuery = LineItemQuery::new(
    "net income",
    &[
        "Net Income",
        "Net Income Common Stockholders",
        "NetIncome",
        "netIncome",
    ],
    0.0,
);

/// Total revenue.
pub const TOTAL_REVENUE: LineItemQuery = LineItemQuery::new(
    "total revenue",
    &["Total Revenue", "Revenue", "Operating Revenue", "TotalRevenue", "revenue"],
    1.0,
);

/// Stockholders' equity.
pub const STOCKHOLDERS_EQUITY: LineItemQuery = LineItemQuery::new(
    "stockholders equity",
    &[
        "Stockholders Equity",
        "Total Stockholder Equity",
        "Common Stock Equity",
        "StockholdersEquity",
        "totalStockholdersEquity",
    ],
    1.0,
);

/// Earnings before interest and taxes.
pub const EBIT: LineItemQuery = LineItemQuery::new(
    "ebit",
    &["EBIT", "Operating Income", "OperatingIncome", "operatingIncome"],
    0.0,
);

/// Income before income taxes.
pub const PRETAX_INCOME: LineItemQuery = LineItemQuery::new(
    "pretax income",
    &[
        "Pretax Income",
        "Income Before Tax",
        "Pre-Tax Income",
        "PretaxIncome",
        "incomeBeforeTax",
    ],
    0.0,
);

/// Income tax provision.
pub const TAX_PROVISION: LineItemQuery = LineItemQuery::new(
    "tax provision",
    &[
        "Tax Provision",
        "Income Tax Expense",
        "IncomeTaxExpense",
        "Provision for Income Taxes",
        "incomeTaxExpense",
    ],
    0.0,
);

/// Interest expense. Providers report it with either sign.
pub const INTEREST_EXPENSE: LineItemQuery = LineItemQuery::new(
    "interest expense",
    &[
        "Interest Expense",
        "Interest Expense Non Operating",
        "InterestExpense",
        "interestExpense",
    ],
    0.0,
);

/// Total debt.
pub const TOTAL_DEBT: LineItemQuery = LineItemQuery::new(
    "total debt",
    &["Total Debt", "TotalDebt", "totalDebt"],
    0.0,
);

/// Cash and equivalents.
pub const CASH: LineItemQuery = LineItemQuery::new(
    "cash",
    &[
        "Cash And Cash Equivalents",
        "Cash Cash Equivalents And Short Term Investments",
        "CashAndCashEquivalents",
        "cashAndCashEquivalents",
    ],
    0.0,
);

/// Free cash flow.
pub const FREE_CASH_FLOW: LineItemQuery = LineItemQuery::new(
    "free cash flow",
    &["Free Cash Flow", "FreeCashFlow", "freeCashFlow"],
    0.0,
);

/// Cash flow from operations.
pub const OPERATING_CASH_FLOW: LineItemQuery = LineItemQuery::new(
    "operating cash flow",
    &[
        "Operating Cash Flow",
        "Cash Flow From Continuing Operating Activities",
        "OperatingCashFlow",
        "operatingCashFlow",
    ],
    0.0,
);

/// Capital expenditure, usually reported negative.
pub const CAPITAL_EXPENDITURE: LineItemQuery = LineItemQuery::new(
    "capital expenditure",
    &["Capital Expenditure", "CapitalExpenditure", "capitalExpenditure"],
    0.0,
);

/// Diluted earnings per share.
pub const DILUTED_EPS: LineItemQuery = LineItemQuery::new(
    "diluted eps",
    &["Diluted EPS", "DilutedEPS", "epsDiluted", "epsdiluted"],
    0.0,
);

/// Every query in the catalogue.
pub const ALL: &[LineItemQuery] = &[
    NET_INCOME,
    TOTAL_REVENUE,
    STOCKHOLDERS_EQUITY,
    EBIT,
    PRETAX_INCOME,
    TAX_PROVISION,
    INTEREST_EXPENSE,
    TOTAL_DEBT,
    CASH,
    FREE_CASH_FLOW,
    OPERATING_CASH_FLOW,
    CAPITAL_EXPENDITURE,
    DILUTED_EPS,
];
