use crate::constants::MAX_ARGUMENT_LENGTH;
use crate::core_ftpcommand::ftpcommand::{parse_command, raw_argument, FtpCommand};
use crate::core_ftpcommand::{
    abor, cwd, dele, feat, help, list, mdtm, mkd, noop, pass, pwd, quit, retr, rmd, rnfr, rnto,
    size, stor, syst, type_, user,
};
use crate::core_network::{pasv, port};
use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use log::{debug, warn};

/// Whether the control loop keeps reading after a command.
pub type ContinueSession = bool;

/// Parses and executes one control line.
///
/// Returns `Ok(false)` when the session must end: QUIT, ABOR, or an argument
/// over the length cap (dropped without a reply). An `Err` means the control
/// connection itself failed.
pub async fn execute(
    writer: &mut ControlWriter,
    session: &mut Session,
    raw_line: &str,
) -> Result<ContinueSession, std::io::Error> {
    let mut parsed = parse_command(raw_line);

    if let Some(arg) = raw_argument(raw_line) {
        if arg.chars().count() > MAX_ARGUMENT_LENGTH {
            warn!(
                "Argument of {} from {} exceeds {} characters, disconnecting",
                parsed.token,
                session.remote_addr(),
                MAX_ARGUMENT_LENGTH
            );
            return Ok(false);
        }
    }

    if !session.context.config.is_command_enabled(&parsed.token) {
        debug!("Command {} is disabled", parsed.token);
        parsed.command = FtpCommand::Unknown(parsed.token.clone());
    }

    if parsed.command == FtpCommand::PASS {
        debug!("[{}] PASS ****", session.remote_addr());
    } else {
        debug!(
            "[{}] {} {}",
            session.remote_addr(),
            parsed.token,
            parsed.arg.as_deref().unwrap_or("")
        );
    }

    if !session.is_authenticated() {
        return execute_pre_auth(writer, session, parsed.command, parsed.arg).await;
    }
    execute_post_auth(writer, session, parsed.command, parsed.arg).await
}

async fn execute_pre_auth(
    writer: &mut ControlWriter,
    session: &mut Session,
    command: FtpCommand,
    arg: Option<String>,
) -> Result<ContinueSession, std::io::Error> {
    match (command, arg) {
        (FtpCommand::USER, Some(arg)) => user::handle_user_command(writer, session, arg).await?,
        (FtpCommand::USER, None) => send_response(writer, responses::REQUIRES_PARAMETER).await?,
        (FtpCommand::PASS, arg) => {
            pass::handle_pass_command(writer, session, arg.unwrap_or_default()).await?
        }
        _ => send_response(writer, responses::NOT_LOGGED_IN).await?,
    }
    Ok(true)
}

async fn execute_post_auth(
    writer: &mut ControlWriter,
    session: &mut Session,
    command: FtpCommand,
    arg: Option<String>,
) -> Result<ContinueSession, std::io::Error> {
    if let FtpCommand::Unknown(token) = &command {
        debug!("Unrecognized command: {}", token);
        send_response(writer, responses::NOT_UNDERSTOOD).await?;
        return Ok(true);
    }

    if command.requires_argument() && arg.is_none() {
        send_response(writer, responses::REQUIRES_PARAMETER).await?;
        return Ok(true);
    }

    if command.requires_data_channel() && !session.data.is_open() {
        send_response(writer, responses::CANT_OPEN_DATA).await?;
        return Ok(true);
    }

    if let Some(account) = &session.account {
        if !command.is_permitted(account.permission()) {
            warn!(
                "{:?} denied for {} ({:?})",
                command,
                account.username(),
                account.permission()
            );
            send_response(writer, responses::ACCESS_DENIED).await?;
            return Ok(true);
        }
    }

    let arg_str = arg.unwrap_or_default();
    match command {
        FtpCommand::USER | FtpCommand::PASS => {
            send_response(writer, responses::NOT_LOGGED_IN).await?
        }
        FtpCommand::QUIT => {
            quit::handle_quit_command(writer).await?;
            return Ok(false);
        }
        FtpCommand::ABOR => {
            abor::handle_abor_command(writer, session).await?;
            return Ok(false);
        }
        FtpCommand::PWD => pwd::handle_pwd_command(writer, session).await?,
        FtpCommand::CWD => cwd::handle_cwd_command(writer, session, arg_str).await?,
        FtpCommand::TYPE => type_::handle_type_command(writer, session, arg_str).await?,
        FtpCommand::MKD => mkd::handle_mkd_command(writer, session, arg_str).await?,
        FtpCommand::RMD => rmd::handle_rmd_command(writer, session, arg_str).await?,
        FtpCommand::DELE => dele::handle_dele_command(writer, session, arg_str).await?,
        FtpCommand::LIST => list::handle_list_command(writer, session, arg_str, false).await?,
        FtpCommand::NLST => list::handle_list_command(writer, session, arg_str, true).await?,
        FtpCommand::RNFR => rnfr::handle_rnfr_command(writer, session, arg_str).await?,
        FtpCommand::RNTO => rnto::handle_rnto_command(writer, session, arg_str).await?,
        FtpCommand::STOR => stor::handle_stor_command(writer, session, arg_str).await?,
        FtpCommand::RETR => retr::handle_retr_command(writer, session, arg_str).await?,
        FtpCommand::PORT | FtpCommand::EPRT => {
            port::handle_port_command(writer, session, arg_str).await?
        }
        FtpCommand::PASV | FtpCommand::EPSV => pasv::handle_pasv_command(writer, session).await?,
        FtpCommand::NOOP => noop::handle_noop_command(writer).await?,
        FtpCommand::SYST => syst::handle_syst_command(writer).await?,
        FtpCommand::FEAT => feat::handle_feat_command(writer).await?,
        FtpCommand::HELP => help::handle_help_command(writer).await?,
        FtpCommand::SIZE => size::handle_size_command(writer, session, arg_str).await?,
        FtpCommand::MDTM => mdtm::handle_mdtm_command(writer, session, arg_str).await?,
        FtpCommand::ALLO => send_response(writer, responses::ALLO_SUPERFLUOUS).await?,
        FtpCommand::Unknown(_) => send_response(writer, responses::NOT_UNDERSTOOD).await?,
    }
    Ok(true)
}
