// Fixed reply vocabulary of the control channel.

pub const OPENING_DATA_ASCII: &[u8] = b"150 Opening ASCII mode data connection.\r\n";
pub const OPENING_DATA_BINARY: &[u8] = b"150 Opening BINARY mode data connection.\r\n";

pub const COMMAND_OK: &[u8] = b"200 Command okay.\r\n";
pub const NOOP_OK: &[u8] = b"200 NOOP ok.\r\n";
pub const ALLO_SUPERFLUOUS: &[u8] = b"202 Command not implemented, superfluous at this site.\r\n";
pub const SYSTEM_TYPE: &[u8] = b"215 UNIX Type: L8\r\n";
pub const GOODBYE: &[u8] = b"221 Service closing control connection.\r\n";
pub const TRANSFER_COMPLETE: &[u8] = b"226 Transfer complete.\r\n";
pub const ABORT_OK: &[u8] = b"226 Closing data connection, session aborted.\r\n";
pub const LOGGED_IN: &[u8] = b"230 User logged in, proceed.\r\n";
pub const ACTION_COMPLETED: &[u8] = b"250 Requested file action okay, completed.\r\n";
pub const NEED_PASSWORD: &[u8] = b"331 User name okay, need password.\r\n";
pub const ANONYMOUS_NEED_PASSWORD: &[u8] =
    b"331 Anonymous login okay, send your complete email address as password.\r\n";
pub const PENDING_FURTHER_INFO: &[u8] =
    b"350 Requested file action pending further information.\r\n";

pub const TOO_MANY_CONNECTIONS: &[u8] = b"421 Too many connections, try again later.\r\n";
pub const IDLE_TIMEOUT: &[u8] = b"421 Timeout.\r\n";
pub const CANT_OPEN_DATA: &[u8] = b"425 Can't open data connection.\r\n";

pub const NOT_UNDERSTOOD: &[u8] = b"500 Syntax error, command unrecognized.\r\n";
pub const SYNTAX_ERROR: &[u8] = b"501 Syntax error in parameters or arguments.\r\n";
pub const REQUIRES_PARAMETER: &[u8] = b"501 Command requires a parameter.\r\n";
pub const BAD_SEQUENCE: &[u8] = b"503 Bad sequence of commands.\r\n";
pub const NOT_LOGGED_IN: &[u8] = b"530 Not logged in.\r\n";
pub const ACTION_NOT_TAKEN: &[u8] = b"550 Requested action not taken.\r\n";
pub const ACCESS_DENIED: &[u8] = b"550 Access denied.\r\n";
pub const PORT_REFUSED: &[u8] =
    b"550 PORT refused, address does not match the control connection.\r\n";
pub const SERVICE_SHUTTING_DOWN: &[u8] =
    b"421 Service not available, closing control connection.\r\n";
pub const TRANSFER_ABORTED: &[u8] = b"426 Connection closed; transfer aborted.\r\n";
