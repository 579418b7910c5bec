/// One validated contact row, eligible for messaging
///
/// Built only by the spreadsheet parser, which guarantees that all three
/// fields are present and non-empty. The phone number is kept raw here;
/// E.164 normalization happens at send time.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Recipient {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}
