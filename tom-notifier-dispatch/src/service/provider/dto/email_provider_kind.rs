#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::Display)]
#[strum(ascii_case_insensitive)]
pub enum EmailProviderKind {
    #[default]
    #[strum(serialize = "smtp")]
    Smtp,

    #[strum(to_string = "mailchimp", serialize = "mandrill")]
    Mailchimp,
}
