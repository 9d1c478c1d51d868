use crate::helpers::{send_multiline_response, ControlWriter};

const FEATURES: &[&str] = &["SIZE", "MDTM", "PASV", "EPSV", "EPRT"];

pub async fn handle_feat_command(writer: &mut ControlWriter) -> Result<(), std::io::Error> {
    send_multiline_response(writer, 211, "Features:", FEATURES, "End").await
}
