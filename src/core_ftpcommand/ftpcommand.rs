use crate::core_auth::Permission;

#[allow(clippy::upper_case_acronyms)]
#[derive(Eq, Hash, PartialEq, Debug, Clone)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    ABOR,
    PWD,
    CWD,
    TYPE,
    MKD,
    RMD,
    DELE,
    LIST,
    NLST,
    RNFR,
    RNTO,
    STOR,
    RETR,
    PORT,
    EPRT,
    PASV,
    EPSV,
    NOOP,
    SYST,
    FEAT,
    HELP,
    SIZE,
    MDTM,
    ALLO,
    Unknown(String),
}

impl FtpCommand {
    pub fn from_str(cmd: &str) -> FtpCommand {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => FtpCommand::USER,
            "PASS" => FtpCommand::PASS,
            "QUIT" => FtpCommand::QUIT,
            "ABOR" => FtpCommand::ABOR,
            "PWD" | "XPWD" => FtpCommand::PWD,
            "CWD" | "XCWD" => FtpCommand::CWD,
            "TYPE" => FtpCommand::TYPE,
            "MKD" | "XMKD" => FtpCommand::MKD,
            "RMD" | "XRMD" => FtpCommand::RMD,
            "DELE" => FtpCommand::DELE,
            "LIST" => FtpCommand::LIST,
            "NLST" => FtpCommand::NLST,
            "RNFR" => FtpCommand::RNFR,
            "RNTO" => FtpCommand::RNTO,
            "STOR" => FtpCommand::STOR,
            "RETR" => FtpCommand::RETR,
            "PORT" => FtpCommand::PORT,
            "EPRT" => FtpCommand::EPRT,
            "PASV" => FtpCommand::PASV,
            "EPSV" => FtpCommand::EPSV,
            "NOOP" => FtpCommand::NOOP,
            "SYST" => FtpCommand::SYST,
            "FEAT" => FtpCommand::FEAT,
            "HELP" => FtpCommand::HELP,
            "SIZE" => FtpCommand::SIZE,
            "MDTM" => FtpCommand::MDTM,
            "ALLO" => FtpCommand::ALLO,
            other => FtpCommand::Unknown(other.to_string()),
        }
    }

    pub fn requires_argument(&self) -> bool {
        matches!(
            self,
            FtpCommand::USER
                | FtpCommand::CWD
                | FtpCommand::TYPE
                | FtpCommand::MKD
                | FtpCommand::RMD
                | FtpCommand::DELE
                | FtpCommand::PORT
                | FtpCommand::EPRT
                | FtpCommand::RNFR
                | FtpCommand::RNTO
                | FtpCommand::STOR
                | FtpCommand::RETR
                | FtpCommand::SIZE
                | FtpCommand::MDTM
        )
    }

    pub fn requires_data_channel(&self) -> bool {
        matches!(
            self,
            FtpCommand::LIST | FtpCommand::NLST | FtpCommand::STOR | FtpCommand::RETR
        )
    }

    pub fn is_permitted(&self, permission: Permission) -> bool {
        match self {
            FtpCommand::STOR
            | FtpCommand::DELE
            | FtpCommand::RNFR
            | FtpCommand::RNTO
            | FtpCommand::RMD
            | FtpCommand::MKD => permission.can_upload(),
            FtpCommand::RETR => permission.can_download(),
            _ => true,
        }
    }
}

/// One control line, split into its command and optional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub token: String,
    pub command: FtpCommand,
    pub arg: Option<String>,
}

fn split_line(line: &str) -> (&str, Option<&str>) {
    let line = line.trim_end_matches(['\r', '\n']);
    match line.split_once(' ') {
        Some((token, rest)) => (token, Some(rest).filter(|a| !a.is_empty())),
        None => (line, None),
    }
}

/// The argument exactly as the client sent it, before any rewriting.
pub fn raw_argument(line: &str) -> Option<&str> {
    split_line(line).1
}

/// Splits a raw line on its first space. CDUP is rewritten to `CWD ..`.
pub fn parse_command(line: &str) -> ParsedCommand {
    let (token, arg) = split_line(line);
    let token = token.to_ascii_uppercase();
    let arg = arg.map(str::to_string);

    if token == "CDUP" || token == "XCUP" {
        return ParsedCommand {
            token,
            command: FtpCommand::CWD,
            arg: Some("..".to_string()),
        };
    }

    ParsedCommand {
        command: FtpCommand::from_str(&token),
        token,
        arg,
    }
}
