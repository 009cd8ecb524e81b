use uuid::Uuid;

/// Display-number authority.
///
/// Generates numbers in the format `{prefix}-{market}{rand}{sequence}`,
/// e.g. "BOL-NL3F9A0042". The prefix is looked up from the invoice purpose,
/// the random part covers two invoices created against the same stored
/// count, and the sequence is the stored count plus one.
///
/// Numbers are not linearizable across concurrent writers. The store's
/// unique-number constraint is the authority; a collision surfaces as a
/// save failure and the caller retries with a fresh number.
#[derive(Debug, Clone)]
pub struct InvoiceNumbering {
    market: String,
    random_len: usize,
    zero_pad: usize,
}

impl Default for InvoiceNumbering {
    fn default() -> Self {
        Self::new("NL")
    }
}

impl InvoiceNumbering {
    /// Create an authority for the given market marker.
    pub fn new(market: impl Into<String>) -> Self {
        Self {
            market: market.into(),
            random_len: 4,
            zero_pad: 4,
        }
    }

    /// Set zero-padding width of the sequence (default: 4, so "0001").
    pub fn with_padding(mut self, width: usize) -> Self {
        self.zero_pad = width;
        self
    }

    /// Short prefix for a purpose. Unknown or empty purposes map to "INV".
    pub fn prefix_for(purpose: &str) -> &'static str {
        match purpose {
            "BOL" => "BOL",
            "Best4Juniors" => "B4J",
            "Other" => "OTH",
            _ => "INV",
        }
    }

    /// Generate the number for a new invoice given how many are stored.
    pub fn next_number(&self, purpose: &str, stored_count: usize) -> String {
        let disambiguator = self.random_disambiguator();
        self.format_number(purpose, &disambiguator, stored_count as u64 + 1)
    }

    /// Assemble a number from its parts.
    pub fn format_number(&self, purpose: &str, disambiguator: &str, sequence: u64) -> String {
        format!(
            "{}-{}{}{:0>width$}",
            Self::prefix_for(purpose),
            self.market,
            disambiguator.to_uppercase(),
            sequence,
            width = self.zero_pad
        )
    }

    fn random_disambiguator(&self) -> String {
        let hex = Uuid::new_v4().simple().to_string();
        hex[..self.random_len].to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_lookup() {
        assert_eq!(InvoiceNumbering::prefix_for("BOL"), "BOL");
        assert_eq!(InvoiceNumbering::prefix_for("Best4Juniors"), "B4J");
        assert_eq!(InvoiceNumbering::prefix_for("Other"), "OTH");
        assert_eq!(InvoiceNumbering::prefix_for(""), "INV");
        assert_eq!(InvoiceNumbering::prefix_for("Workshop"), "INV");
    }

    #[test]
    fn format_pads_sequence() {
        let numbering = InvoiceNumbering::default();
        assert_eq!(numbering.format_number("BOL", "ab12", 7), "BOL-NLAB120007");
        assert_eq!(numbering.format_number("", "FFFF", 12345), "INV-NLFFFF12345");
    }

    #[test]
    fn custom_padding() {
        let numbering = InvoiceNumbering::new("BE").with_padding(6);
        assert_eq!(numbering.format_number("Other", "0A0A", 1), "OTH-BE0A0A000001");
    }

    #[test]
    fn next_number_uses_count_plus_one() {
        let numbering = InvoiceNumbering::default();
        let number = numbering.next_number("BOL", 41);
        assert!(number.starts_with("BOL-NL"), "{number}");
        assert!(number.ends_with("0042"), "{number}");
        assert_eq!(number.len(), "BOL-NL".len() + 4 + 4);
        let random = &number[6..10];
        assert!(
            random
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()),
            "{random}"
        );
    }

    #[test]
    fn unknown_purpose_gets_generic_prefix() {
        let number = InvoiceNumbering::default().next_number("Sponsoring", 0);
        assert!(number.starts_with("INV-NL"));
        assert!(number.ends_with("0001"));
    }
}
