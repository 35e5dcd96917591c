//! Static per-bank detection keywords and field patterns.
//!
//! Pattern order within a field is a priority order: earlier patterns target the
//! exact statement layout and shadow the looser ones after them. `{AMT}` expands to
//! [`patterns::AMOUNT`].

use lazy_static::lazy_static;

use super::extractor::{FieldPattern, FieldRule};
use super::rules::patterns::{
    self, GENERIC_CARD, GENERIC_CREDIT_LIMIT, GENERIC_DUE_DATE, GENERIC_NAME, GENERIC_TOTAL_DUE,
};
use super::rules::Guard;
use crate::models::{Bank, FieldName};

/// Detection keywords and extraction rules for one bank.
#[derive(Debug, Clone)]
pub struct BankProfile {
    pub bank: Bank,
    /// Lowercase, whitespace-normalized substrings.
    pub keywords: &'static [&'static str],
    /// One rule per field, in export order.
    pub rules: Vec<FieldRule>,
}

impl BankProfile {
    pub fn rule(&self, field: FieldName) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.field == field)
    }
}

const NAME_WORDS: Guard = Guard::Name {
    min_words: 2,
    max_words: 5,
};

/// Pattern spec: regex source plus optional guard.
type Spec = (&'static str, Option<Guard>);

/// Bank patterns first, then the generic fallbacks under `generic_guard`.
fn compile(
    specs: &[Spec],
    generic: &[&'static str],
    generic_guard: Option<Guard>,
) -> Vec<FieldPattern> {
    specs
        .iter()
        .copied()
        .chain(generic.iter().map(|p| (*p, generic_guard)))
        .map(|(source, guard)| {
            let pattern = FieldPattern::new(&patterns::expand(source)).unwrap();
            match guard {
                Some(g) => pattern.with_guard(g),
                None => pattern,
            }
        })
        .collect()
}

struct ProfileSpec {
    bank: Bank,
    keywords: &'static [&'static str],
    name: &'static [Spec],
    card: &'static [Spec],
    credit_limit: &'static [Spec],
    total_due: &'static [Spec],
    due_date: &'static [Spec],
}

impl ProfileSpec {
    fn build(&self) -> BankProfile {
        BankProfile {
            bank: self.bank,
            keywords: self.keywords,
            rules: vec![
                FieldRule::new(
                    FieldName::CardholderName,
                    compile(self.name, GENERIC_NAME, Some(NAME_WORDS)),
                ),
                FieldRule::new(FieldName::CardNumber, compile(self.card, GENERIC_CARD, None)),
                FieldRule::new(
                    FieldName::CreditLimit,
                    compile(self.credit_limit, GENERIC_CREDIT_LIMIT, None),
                ),
                FieldRule::new(
                    FieldName::TotalDue,
                    compile(self.total_due, GENERIC_TOTAL_DUE, None),
                ),
                FieldRule::new(
                    FieldName::PaymentDueDate,
                    compile(self.due_date, GENERIC_DUE_DATE, None),
                ),
            ],
        }
    }
}

const AXIS: ProfileSpec = ProfileSpec {
    bank: Bank::Axis,
    keywords: &["axis bank", "axis bank limited", "axisbank.com", "axis credit card"],
    name: &[(r"Name\s+([A-Z][A-Z\s]+?)(?:\n|$)", Some(NAME_WORDS))],
    card: &[
        (r"(?i)(?:Card\s+No:?\s+)?(\d{6}\*+\d{4})", None),
        (r"(?i)Credit\s+Card\s+Number\s+.*?\s+(\d{6}\*+\d{4})", None),
    ],
    credit_limit: &[(
        r"\d{6}\*+\d{4}\s+({AMT})\s+{AMT}\s+{AMT}",
        Some(Guard::MinAmount(10_000)),
    )],
    total_due: &[
        (
            r"(?is)Total\s+Payment\s+Due\s+Minimum\s+Payment\s+Due.*?\n\s*({AMT})\s+Dr",
            None,
        ),
        (r"(?is)Total\s+Payment\s+Due[^\d]*?({AMT})\s+Dr", None),
    ],
    due_date: &[(r"(?i)Payment\s+Due\s+Date[^\d]*?(\d{2}/\d{2}/\d{4})", None)],
};

const CITI: ProfileSpec = ProfileSpec {
    bank: Bank::Citi,
    keywords: &[
        "citibank",
        "citi bank",
        "citibank n.a.",
        "citi credit card",
        "citibank.co.in",
        "citi india",
    ],
    name: &[
        (r"\*\s*[\d\s]+\s*C\*[^\n]*\n([A-Z]{15,})\n(?:DEP-|[A-Z]{2,}-)", None),
        (r"\n([A-Z]{15,})\n(?:DEP-ED|AT/PO|POBLACION)", None),
        (r"C\*[^\n]*\n([A-Z\s]{10,50}?)\n[A-Z]{2,}-[A-Z]", None),
    ],
    card: &[
        (r"(?i)CardNumber\s*:\s*(\d{4}-\d{4}-\d{4}-\d{4})", None),
        (r"\b(\d{4}-\d{4}-\d{4}-\d{4})\b", None),
    ],
    credit_limit: &[
        (
            r"(?i)ACCOUNT[^\n]*?CREDIT\s*LIMIT[^\n]*?\n\s*({AMT})",
            Some(Guard::MinAmount(50_000)),
        ),
        (r"(?i)CREDIT\s*LIMIT[^\d]*?({AMT})", Some(Guard::MinAmount(50_000))),
    ],
    total_due: &[(r"(?i)TotalAmountDue\s*\(\s*\)\s*:\s*({AMT})", None)],
    due_date: &[(r"(?i)PaymentDueDate\s*:\s*(\d{2}/\d{2}/\d{2,4})", None)],
};

const HDFC: ProfileSpec = ProfileSpec {
    bank: Bank::Hdfc,
    keywords: &[
        "hdfc bank",
        "hdfc bank ltd",
        "hdfcbank.com",
        "hdfc credit card",
        "housing development finance corporation",
    ],
    name: &[
        (r"[Nn]ame\s*:\s*([A-Z][A-Z\s]+?)\s+Statement", Some(NAME_WORDS)),
        (r"rd\s*:\s*([A-Z][A-Z\s]+?)\s+Statement", None),
        (r"(?i)000.*?rd[^A-Z]*([A-Z]+\s+[A-Z]+)\s+Statement", None),
        (
            r"\b([A-Z]{3,}\s+[A-Z]{3,}(?:\s+[A-Z]{3,})?)\s+Statement\s+for\s+HDFC",
            None,
        ),
    ],
    card: &[(r"(?i)Card\s*No\.?\s*:?\s*([0-9X\*][0-9X\* ]*\d{4})\b", None)],
    credit_limit: &[(
        r"(?i)Credit\s+Limit\s+Available\s+Credit\s+Limit[^\n]*\n[^\d]*?({AMT})",
        None,
    )],
    total_due: &[(
        r"(?i)Payment\s+Due\s+Date\s+Total\s+Dues\s+Minimum\s+Amount\s+Due[^\n]*\n[^\d]*?\d{2}/\d{2}/\d{4}\s+({AMT})",
        None,
    )],
    due_date: &[(
        r"(?i)Payment\s+Due\s+Date\s+Total\s+Dues[^\n]*\n[^\d]*?(\d{2}/\d{2}/\d{4})",
        None,
    )],
};

const ICICI: ProfileSpec = ProfileSpec {
    bank: Bank::Icici,
    keywords: &["icici bank", "icici bank limited", "icicibank.com", "icici credit card"],
    name: &[(
        r"(?m)^((?:MR|MS|MRS|DR)\.?\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
        None,
    )],
    card: &[(r"\b(\d{4}X{8}\d{4})\b", None)],
    credit_limit: &[(
        r"(?i)Credit\s+Limit\s+\(Including\s+cash\)[^\n]*\n[^\d]*?`({AMT})",
        None,
    )],
    total_due: &[(r"(?i)Total\s+Amount\s+due\s*\n[^\d]*?`({AMT})", None)],
    due_date: &[(
        r"(?i)P+A+Y+M+E+N+T+\s+D+U+E+\s+D+A+T+E+[^\n]*\n\s*([A-Z][a-z]+\s+\d{1,2},\s+\d{4})",
        None,
    )],
};

const SILK: ProfileSpec = ProfileSpec {
    bank: Bank::Silk,
    keywords: &["silk bank", "silkbank limited", "silkbank.com", "silk credit card"],
    name: &[(
        r"(?i)Cardholder'?s?\s+Name[^\n]*\n\s*([A-Z][A-Z\s]+?)\s+\d{4}",
        Some(NAME_WORDS),
    )],
    card: &[(
        r"(?i)Card\s+Number[^\n]*\n[^\d]*?(\d{4}\s+\d{4}\s+\d{4}\s+\d{4})",
        None,
    )],
    credit_limit: &[(
        r"\d{4}\s+\d{4}\s+\d{4}\s+\d{4}\s+({AMT})",
        Some(Guard::AmountBetween(5_000, 10_000_000)),
    )],
    total_due: &[(r"(?i)=\s*Current\s+Balance\s*\n[^\d]*?({AMT})", None)],
    due_date: &[(
        r"(?i)Statement\s+Date\s+Payment\s+Due\s+Date[^\n]*\n[^\d]*?\d{4}\s+\d{2}-[A-Z][a-z]{2}-\d{4}\s+(\d{2}-[A-Z][a-z]{2}-\d{4})",
        None,
    )],
};

lazy_static! {
    /// Profiles in configuration order.
    pub static ref PROFILES: Vec<BankProfile> =
        [AXIS, CITI, HDFC, ICICI, SILK].iter().map(ProfileSpec::build).collect();
}

/// All profiles in configuration order.
pub fn profiles() -> &'static [BankProfile] {
    &PROFILES
}

/// Profile for a bank, `None` for [`Bank::Unknown`].
pub fn profile_for(bank: Bank) -> Option<&'static BankProfile> {
    PROFILES.iter().find(|p| p.bank == bank)
}
