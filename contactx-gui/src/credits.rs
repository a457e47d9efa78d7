//! Who made ContactX and where to find them.

use chrono::Datelike;

pub const AUTHOR: &str = "Carlos Henrique Tourinho Santana";

/// A clickable link: label, text shown to the user, target.
pub struct Link {
    pub label: &'static str,
    pub text: &'static str,
    pub url: &'static str,
}

pub static LINKS: [Link; 4] = [
    Link {
        label: "Email",
        text: "henriquetourinho@riseup.net",
        url: "mailto:henriquetourinho@riseup.net",
    },
    Link {
        label: "GitHub",
        text: "github.com/henriquetourinho",
        url: env!("CARGO_PKG_HOMEPAGE"),
    },
    Link {
        label: "Homepage",
        text: "henriquetourinho.com",
        url: "https://henriquetourinho.com/",
    },
    Link {
        label: "Debian Wiki",
        text: "wiki.debian.org/henriquetourinho",
        url: "https://wiki.debian.org/henriquetourinho",
    },
];

pub fn footer() -> String {
    format!("Salvador, Bahia - {}", chrono::Local::now().year())
}

/// Open `url` with the desktop's default handler without waiting for it.
pub fn open_link(url: &str) -> std::io::Result<()> {
    open::that_detached(url)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_links_have_schemes() {
        for link in &LINKS {
            assert!(
                link.url.starts_with("https://") || link.url.starts_with("mailto:"),
                "{} has no scheme: {}",
                link.label,
                link.url
            );
        }
    }

    #[test]
    fn test_footer_has_current_year() {
        let year = chrono::Local::now().year().to_string();

        assert!(footer().starts_with("Salvador, Bahia - "));
        assert!(footer().ends_with(&year));
    }
}
