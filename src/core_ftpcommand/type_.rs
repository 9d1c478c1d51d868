use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::{Session, TransferType};

/// Handles the TYPE FTP command.
///
/// Accepts `A`/`ASCII` and `I`/`BINARY` in any case. The flag only changes how
/// transfers are announced; bytes are always sent unmodified.
pub async fn handle_type_command(
    writer: &mut ControlWriter,
    session: &mut Session,
    arg: String,
) -> Result<(), std::io::Error> {
    let transfer_type = match arg.trim().to_ascii_uppercase().as_str() {
        "A" | "ASCII" => TransferType::Ascii,
        "I" | "BINARY" => TransferType::Binary,
        _ => return send_response(writer, responses::SYNTAX_ERROR).await,
    };
    session.transfer_type = transfer_type;
    let response = format!("200 Type set to {}.\r\n", transfer_type.code());
    send_response(writer, response.as_bytes()).await
}
