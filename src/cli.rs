use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Login name passed by sshd through the %u token of AuthorizedKeysCommand
    #[arg(value_name = "LOGIN")]
    pub login_name: Option<String>,

    /// Serve only the keys of this IAM group's members
    #[arg(short, long, value_name = "NAME")]
    pub group: Option<String>,

    /// Serve keys only when the requested login name equals this user
    #[arg(short = 'u', long, value_name = "NAME")]
    pub expected_user: Option<String>,

    /// Write log output to this file in addition to stderr
    #[arg(long, value_name = "FILE")]
    pub log: Option<String>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,
}

impl Cli {
    /// False only when an expected user is configured and the requested
    /// login name is missing or different. Refused logins are not errors;
    /// the caller answers them with an empty key listing and success.
    pub fn permits_login(&self) -> bool {
        match self.expected_user.as_deref() {
            None | Some("") => true,
            Some(expected) => self.login_name.as_deref() == Some(expected),
        }
    }
}
