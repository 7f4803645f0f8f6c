//! Built-in brand copy.
//!
//! Pages read their content from CMS sections and fall back to these values
//! field by field when a section, setting or the whole API is unavailable.

use volta_core::content::{FaqItem, ReasonItem};

pub const SITE_NAME: &str = "Volta Generators";

// =============================================================================
// Contact
// =============================================================================

pub const CONTACT_EMAIL: &str = "Info@voltagenerators.com";
pub const CONTACT_PHONE: &str = "+971503635488";
pub const CONTACT_ADDRESS: &str =
    "VOLTA GENERATORS FZC 4P-04, P.B.No.51564 Hamriyah Free Zone Sharjah, UAE";

pub const INSTAGRAM_URL: &str = "https://instagram.com/voltagenerators";
pub const FACEBOOK_URL: &str = "https://facebook.com/voltagenerators";
pub const YOUTUBE_URL: &str = "https://youtube.com/voltagenerators";
pub const WHATSAPP_URL: &str = "https://wa.me/971503635488";

// =============================================================================
// Navigation
// =============================================================================

/// A top-level navigation link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

pub const NAV_ITEMS: [NavItem; 6] = [
    NavItem { label: "Home", href: "/" },
    NavItem { label: "About Us", href: "/about-us" },
    NavItem { label: "Gallery", href: "/gallery" },
    NavItem { label: "Calculator", href: "/calculator" },
    NavItem { label: "News", href: "/news" },
    NavItem { label: "Contact", href: "/contact" },
];

pub const NAV_TEXT: &str = "Volta Generators FZE";
pub const SEARCH_PLACEHOLDER: &str = "Search...";
pub const LOGO_PATH: &str = "/static/images/logo-volta.svg";

pub const FOOTER_SERVICES: [&str; 6] = [
    "Diesel Generators",
    "Maintenance",
    "Genuine Spare Parts & Accessories",
    "ATS & Synchro Solutions",
    "Fuel Tanks",
    "Tower Light",
];

// =============================================================================
// Home page
// =============================================================================

pub const HERO_TITLE: &str = "YOUR GLOBAL POWER SOLUTION PARTNER";
pub const HERO_BUTTON: &str = "GET A FREE QUOTE";
pub const HERO_IMAGE: &str = "/static/images/generator.svg";

pub const WHO_WE_ARE: &str = "At Volta Generators, we take pride in being a dynamic force in the \
    realm of diesel generator sets, offering an extensive range of international brands renowned \
    for their reliability and performance. Our commitment to excellence is reflected in our \
    partnerships with world-famous engine manufacturers such as Perkins and Cummins, coupled with \
    top-notch alternators from Stamford and Leroy Somer.";

/// `(number, label)` pairs shown under "Who we are".
pub const STATS: [(&str, &str); 4] = [
    ("12+", "Years Experience"),
    ("500+", "Projects Completed"),
    ("50+", "Global Partners"),
    ("24/7", "Support Available"),
];

pub const VISION: &str = "We envision a future where reliable power is within reach for every \
    individual and business. By keeping our prices reasonable and our standards high, we aim to \
    bridge gaps and light up spaces where power is essential.";

pub const MISSION: &str = "Volta Generators strives to be your goto source for affordable \
    excellence, delivering reliable power solutions backed by world-class partnerships and \
    unmatched expertise in the field.";

/// `(title, description)` pairs for "Our core values".
pub const CORE_VALUES: [(&str, &str); 4] = [
    (
        "Honesty",
        "At Volta Generators, integrity is the cornerstone of everything we do. We are committed \
         to fostering trust through transparent and ethical practices in every interaction. Our \
         approach is simple: clear communication, no hidden agendas, and fair dealings.",
    ),
    (
        "Quality",
        "We take pride in our products, which are engineered for durability and efficiency, \
         ensuring optimal performance in challenging environments. Our products undergo rigorous \
         testing and quality control processes to ensure they meet the highest industry standards.",
    ),
    (
        "Accessibility",
        "Power should be accessible to all. We focus on making our products and services \
         accessible to a wide range of clients, ensuring that everyone can benefit from reliable \
         and affordable power solutions.",
    ),
    (
        "Customer Focus",
        "We prioritize our customers' needs, providing tailored solutions and exceptional service \
         to meet their unique requirements.",
    ),
];

/// `(title, description)` pairs for "Our products".
pub const PRODUCTS: [(&str, &str); 4] = [
    (
        "Diesel Generators",
        "The leading generator brand in the MENA area",
    ),
    ("Maintenance", "Professional after sales support"),
    (
        "Genuine Spare Parts & Accessories",
        "Meeting the requirements of business across the globe",
    ),
    (
        "ATS & Synchro Solutions",
        "High Performance digital controllers",
    ),
];

pub const COVERAGE: [&str; 9] = [
    "Lebanon",
    "Qatar",
    "Saudi Arabia",
    "United Arab Emirates",
    "Kuwait",
    "Iraq",
    "Egypt",
    "Jordan",
    "Oman",
];

/// `(author, quote)` pairs shown under the coverage map.
pub const TESTIMONIALS: [(&str, &str); 3] = [
    (
        "ASHRAF MANSOUR",
        "Excellent service. I ordered a 660 KVA generator for my factory and it was delivered \
         on time at a very competitive price. Thanks for the continuous follow-up of the shipment.",
    ),
    (
        "KYLE",
        "Their prices are really competitive, and the delivery was faster than expected. The \
         sales team answered all my questions and made sure I got the right generator for my \
         needs. Will be using them again!",
    ),
    (
        "AWAD K",
        "After a long extensive search for companies, all details and specifications were \
         available. I appreciate the completion of the deal with the most important thing.",
    ),
];

pub const BRANDS: [&str; 8] = [
    "Leroy Somer",
    "DSE",
    "Cummins",
    "Perkins",
    "Stamford",
    "Meccalte",
    "Linz",
    "Murphy",
];

const FAQ: [(&str, &str); 3] = [
    (
        "What is the difference between kW and kVA?",
        "kW (kilowatts) measures real power, the actual work performed, while kVA \
         (kilovolt-amperes) measures apparent power, the total power supplied. The relationship \
         between kW and kVA is determined by the power factor, where kW = kVA × power factor.",
    ),
    (
        "What is a power factor?",
        "Power factor is the ratio between real power (kW) and apparent power (kVA). It \
         indicates how efficiently electrical power is being used, with a perfect power factor \
         being 1.0. Most generators operate at a power factor of 0.8.",
    ),
    (
        "What is the difference between standby, continuous, and prime power ratings?",
        "Standby power is for emergency backup, continuous power is for constant load \
         applications, and prime power is for variable load applications. Each rating \
         determines how long and under what conditions a generator can operate safely.",
    ),
];

const REASONS: [(&str, &str); 5] = [
    (
        "12 years of experience",
        "Committed to continuous growth and proactive management of our projects to deliver \
         top-tier services.",
    ),
    (
        "Leading Industry Experts",
        "Driven by a strong sense of belonging, our team is dedicated to fostering talent and \
         upholding company values.",
    ),
    (
        "Fast & Effective Solutions",
        "Addressing the urgent demand for reliable electricity with solutions that keep pace \
         with today's critical needs.",
    ),
    (
        "Flexible pricing",
        "Offering dynamic pricing while ensuring value without compromising quality.",
    ),
    (
        "Exceptional Team",
        "Focused on enhancing team performance through skill development, training, and a \
         positive, supportive environment.",
    ),
];

/// FAQ shown when the `faq` section has none.
#[must_use]
pub fn default_faq() -> Vec<FaqItem> {
    FAQ.iter()
        .map(|(question, answer)| FaqItem {
            question: (*question).to_string(),
            answer: (*answer).to_string(),
        })
        .collect()
}

/// Reasons shown when the `why_we_are_best` section has none.
#[must_use]
pub fn default_reasons() -> Vec<ReasonItem> {
    REASONS
        .iter()
        .zip(1..)
        .map(|((title, description), reason_id)| ReasonItem {
            reason_id,
            title: (*title).to_string(),
            description: (*description).to_string(),
        })
        .collect()
}

// =============================================================================
// About
// =============================================================================

pub const ABOUT_US: &str = "Volta Generators is a leading manufacturer renowned for our \
    exceptional range of diesel generating sets and power systems. With an extensive portfolio \
    that spans from 4.5 KVA to 4125 KVA, we have established an international reputation for \
    delivering high-quality, reliable power solutions tailored to meet diverse energy needs. Our \
    commitment to excellence is reflected in our innovative designs and rigorous quality control \
    processes, ensuring that every product meets the highest industry standards. At Volta \
    Generators, we understand the critical role that dependable power plays in various sectors \
    including industrial, commercial, and residential applications.";
