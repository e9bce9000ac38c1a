// Built-in fallback texts for pages without stored content.

use super::{ContentRecord, ContentSource};
use crate::db::PageType;

struct DefaultText {
    title: &'static str,
    body: &'static str,
}

fn german(page_type: PageType) -> DefaultText {
    match page_type {
        PageType::Agb => DefaultText {
            title: "Allgemeine Geschäftsbedingungen",
            body: "Diese Allgemeinen Geschäftsbedingungen gelten für alle Buchungen, die über die Plattform vorgenommen werden.\n\n\
                   Die vollständige Fassung wird derzeit überarbeitet. Bei Fragen wenden Sie sich bitte an den Support.",
        },
        PageType::Datenschutz => DefaultText {
            title: "Datenschutzerklärung",
            body: "Wir verarbeiten personenbezogene Daten ausschließlich zur Erbringung unserer Leistungen und im Rahmen der gesetzlichen Vorgaben.\n\n\
                   Die ausführliche Datenschutzerklärung wird in Kürze hier veröffentlicht.",
        },
        PageType::Impressum => DefaultText {
            title: "Impressum",
            body: "Angaben gemäß § 5 DDG.\n\n\
                   Die vollständigen Anbieterangaben werden in Kürze ergänzt.",
        },
        PageType::BetaProgram => DefaultText {
            title: "Beta-Programm",
            body: "Werden Sie Teil unseres Beta-Programms und testen Sie neue Funktionen vor allen anderen.\n\n\
                   Details zur Teilnahme folgen in Kürze.",
        },
    }
}

fn english(page_type: PageType) -> DefaultText {
    match page_type {
        PageType::Agb => DefaultText {
            title: "Terms and Conditions",
            body: "These terms apply to all bookings made through the platform.\n\n\
                   The full version is currently being revised. Please contact support with any questions.",
        },
        PageType::Datenschutz => DefaultText {
            title: "Privacy Policy",
            body: "We process personal data only to provide our services and within the limits of the law.\n\n\
                   The detailed privacy policy will be published here shortly.",
        },
        PageType::Impressum => DefaultText {
            title: "Legal Notice",
            body: "Information pursuant to § 5 DDG.\n\n\
                   Full provider details will be added shortly.",
        },
        PageType::BetaProgram => DefaultText {
            title: "Beta Program",
            body: "Join our beta program and try new features before everyone else.\n\n\
                   Participation details will follow shortly.",
        },
    }
}

/// The fallback record for `page_type`, keeping the requested language tag
pub fn builtin_default(page_type: PageType, language: &str) -> ContentRecord {
    let text = if language == "en" {
        english(page_type)
    } else {
        german(page_type)
    };

    ContentRecord {
        page_type,
        language: language.to_string(),
        title: text.title.to_string(),
        body: text.body.to_string(),
        updated_at: None,
        source: ContentSource::BuiltIn,
    }
}
