//! Built-in Slovak/English keyword families.
//!
//! Each entry is a list of regex alternatives matched anywhere in lowercased
//! text. Terms are stems, so `účt` covers `účtu`, `účtom`, ...

use crate::ThreatCategory;

/// Version tag of the built-in rule set.
pub const BUILTIN_RULESET_VERSION: &str = "sk-en-v1";

const BANK: &[&str] = &[
    "bank", "účt", "iban", "peniaz", "euro", "platb", "prevod", "vklad", "výber", "sepa",
];

const CRYPTO: &[&str] = &[
    "krypto", "crypto", "bitcoin", "btc", "wallet", "binance", "coinbase", "invest", "zisk",
    "burz",
];

const AUTH: &[&str] = &[
    "heslo", "kredit", "kart", "číslo", "poveren", "overen", "identity", "login", "pin", "cvv",
    "údaje",
];

const PRESSURE: &[&str] = &[
    "súrne",
    "rýchlo",
    "nemocnic",
    "polícia",
    "blokovan",
    "problém",
    "exekútor",
    "pokuta",
    "dlh",
    "ihneď",
    "okamžite",
    "zatykač",
    "väzen",
    "ciel",
    "kauci",
];

const DELIVERY: &[&str] = &[
    "balík", "pošta", "zásielka", "kuriér", "dhl", "dpd", "colnic", "doplatok", "clo",
    "tracking", "sledovan",
];

const FAMILY: &[&str] = &[
    "vnúča", "syn", "dcéra", "nehoda", "pomôž", "peniaze", "starká", "mama", "otec", "babka",
    "dedko",
];

const LINK: &[&str] = &["link", "klik", r"bit\.ly", r"t\.me", "https?://"];

const IMPERSONATION: &[&str] = &[
    "podpora",
    "microsoft",
    "admin",
    "riaditeľ",
    "ceo",
    "úrad",
    "technik",
    "it oddelenie",
    "anydesk",
    "teamviewer",
    "vzdialen",
    "prístup",
    "remote",
    "vírus",
    "polícia",
    "exekútor",
    "agent",
];

const SESSION: &[&str] = &[
    "session",
    "cookie",
    "token",
    "expired",
    "re-authenticate",
    "sid=",
    "jsessionid",
];

/// `(category, weight, patterns)` rows in technical-detail order.
pub(crate) const BUILTIN_RULES: &[(ThreatCategory, u32, &[&str])] = &[
    (ThreatCategory::Bank, 30, BANK),
    (ThreatCategory::Crypto, 35, CRYPTO),
    (ThreatCategory::Auth, 40, AUTH),
    (ThreatCategory::Pressure, 30, PRESSURE),
    (ThreatCategory::Delivery, 20, DELIVERY),
    (ThreatCategory::Link, 30, LINK),
    (ThreatCategory::Impersonation, 35, IMPERSONATION),
    (ThreatCategory::Session, 25, SESSION),
    (ThreatCategory::Family, 35, FAMILY),
];
