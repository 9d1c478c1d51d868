use crate::helpers::{send_response, ControlWriter};
use crate::responses;

pub async fn handle_noop_command(writer: &mut ControlWriter) -> Result<(), std::io::Error> {
    send_response(writer, responses::NOOP_OK).await
}
