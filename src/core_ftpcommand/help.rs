use crate::helpers::{send_multiline_response, ControlWriter};

const RECOGNIZED: &[&str] = &[
    "USER PASS QUIT ABOR PWD  XPWD CWD  XCWD CDUP XCUP",
    "TYPE MKD  XMKD RMD  XRMD DELE LIST NLST RNFR RNTO",
    "STOR RETR PORT EPRT PASV EPSV NOOP SYST FEAT HELP",
    "SIZE MDTM ALLO",
];

pub async fn handle_help_command(writer: &mut ControlWriter) -> Result<(), std::io::Error> {
    send_multiline_response(
        writer,
        214,
        "The following commands are recognized:",
        RECOGNIZED,
        "Help OK.",
    )
    .await
}
