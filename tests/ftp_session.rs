use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use vfsftpd::config::Config;
use vfsftpd::server::Server;

const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    root: PathBuf,
    _dir: TempDir,
}

impl TestServer {
    async fn start(server_keys: &str) -> Self {
        Self::start_with_tables(server_keys, "").await
    }

    /// Starts a server with three accounts and a music mount inside alice's home.
    /// `server_keys` go into `[server]`, `tables` are appended as-is.
    async fn start_with_tables(server_keys: &str, tables: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        for sub in ["pub", "alice/docs", "alice/media/music/jazz", "drop"] {
            std::fs::create_dir_all(root.join(sub)).unwrap();
        }
        std::fs::write(root.join("pub/readme.txt"), b"read me\n").unwrap();
        std::fs::write(root.join("drop/secret.txt"), b"hidden").unwrap();

        let toml = format!(
            r#"
            [server]
            listen_address = "127.0.0.1"
            listen_port = 0
            banner = "vfsftpd test"
            {server_keys}

            [[accounts]]
            username = "anonymous"
            home = "{root}/pub"
            permission = "download_only"

            [[accounts]]
            username = "alice"
            password = "wonderland"
            home = "{root}/alice"

            [[accounts]]
            username = "dropbox"
            password = "letmein"
            home = "{root}/drop"
            permission = "upload_only"

            [[mounts]]
            virtual_path = "/music"
            physical_path = "{root}/alice/media/music"

            {tables}
            "#,
            server_keys = server_keys,
            tables = tables,
            root = root.display()
        );
        let config = Config::from_toml(&toml).unwrap();
        let server = Server::bind(config).await.unwrap();
        let addr = server.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        tokio::spawn(async move {
            server.run(token).await.unwrap();
        });

        TestServer {
            addr,
            shutdown,
            root,
            _dir: dir,
        }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

struct Client {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, writer) = stream.into_split();
        Client {
            reader: BufReader::new(read_half),
            writer,
        }
    }

    /// Connects and consumes the greeting.
    async fn greeted(addr: SocketAddr) -> Self {
        let mut client = Client::connect(addr).await;
        let banner = client.reply().await;
        assert!(banner.starts_with("220"), "unexpected banner: {}", banner);
        client
    }

    async fn login(addr: SocketAddr, user: &str, password: &str) -> Self {
        let mut client = Client::greeted(addr).await;
        assert!(client.cmd(&format!("USER {}", user)).await.starts_with("331"));
        let reply = client.cmd(&format!("PASS {}", password)).await;
        assert!(reply.starts_with("230"), "login failed: {}", reply);
        client
    }

    /// Reads one complete reply, following multi-line continuations.
    async fn reply(&mut self) -> String {
        let mut full = String::new();
        loop {
            let mut line = String::new();
            let n = tokio::time::timeout(REPLY_TIMEOUT, self.reader.read_line(&mut line))
                .await
                .expect("timed out waiting for reply")
                .unwrap();
            assert!(n > 0, "connection closed while waiting for reply: {:?}", full);
            full.push_str(&line);
            let bytes = line.as_bytes();
            if bytes.len() >= 4 && bytes[..3].iter().all(u8::is_ascii_digit) && bytes[3] == b' ' {
                return full;
            }
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\r\n", line).as_bytes())
            .await
            .unwrap();
    }

    async fn cmd(&mut self, line: &str) -> String {
        self.send(line).await;
        self.reply().await
    }

    async fn is_closed(&mut self) -> bool {
        let mut line = String::new();
        match tokio::time::timeout(REPLY_TIMEOUT, self.reader.read_line(&mut line)).await {
            Ok(Ok(0)) | Ok(Err(_)) => true,
            _ => false,
        }
    }

    async fn pwd(&mut self) -> String {
        let reply = self.cmd("PWD").await;
        assert!(reply.starts_with("257"), "unexpected PWD reply: {}", reply);
        let start = reply.find('"').unwrap() + 1;
        let end = reply.rfind('"').unwrap();
        reply[start..end].to_string()
    }

    /// Sends PASV and returns the advertised endpoint without connecting.
    async fn passive_endpoint(&mut self) -> SocketAddr {
        let reply = self.cmd("PASV").await;
        assert!(reply.starts_with("227"), "unexpected PASV reply: {}", reply);
        parse_pasv_reply(&reply)
    }

    /// Sends PASV and connects to the advertised endpoint.
    async fn passive(&mut self) -> TcpStream {
        let addr = self.passive_endpoint().await;
        TcpStream::connect(addr).await.unwrap()
    }
}

fn parse_pasv_reply(reply: &str) -> SocketAddr {
    let start = reply.find('(').unwrap() + 1;
    let end = reply.find(')').unwrap();
    let parts: Vec<u16> = reply[start..end]
        .split(',')
        .map(|p| p.trim().parse().unwrap())
        .collect();
    assert_eq!(parts.len(), 6);
    let ip = format!("{}.{}.{}.{}", parts[0], parts[1], parts[2], parts[3]);
    let port = parts[4] * 256 + parts[5];
    format!("{}:{}", ip, port).parse().unwrap()
}

async fn read_all(mut stream: TcpStream) -> Vec<u8> {
    let mut data = Vec::new();
    tokio::time::timeout(REPLY_TIMEOUT, stream.read_to_end(&mut data))
        .await
        .expect("timed out reading data connection")
        .unwrap();
    data
}

/// True once nothing listens on `addr` any more.
async fn listener_closed(addr: SocketAddr) -> bool {
    for _ in 0..40 {
        if TcpStream::connect(addr).await.is_err() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

async fn upload(client: &mut Client, name: &str, payload: &[u8]) {
    let mut data = client.passive().await;
    let reply = client.cmd(&format!("STOR {}", name)).await;
    assert!(reply.starts_with("150"), "unexpected STOR reply: {}", reply);
    data.write_all(payload).await.unwrap();
    data.shutdown().await.unwrap();
    drop(data);
    let done = client.reply().await;
    assert!(done.starts_with("226"), "upload did not complete: {}", done);
}

async fn download(client: &mut Client, name: &str) -> Vec<u8> {
    let data = client.passive().await;
    let reply = client.cmd(&format!("RETR {}", name)).await;
    assert!(reply.starts_with("150"), "unexpected RETR reply: {}", reply);
    let body = read_all(data).await;
    let done = client.reply().await;
    assert!(done.starts_with("226"), "download did not complete: {}", done);
    body
}

#[tokio::test]
async fn test_anonymous_login() {
    let server = TestServer::start("").await;
    let mut client = Client::greeted(server.addr).await;

    assert!(client.cmd("USER anonymous").await.starts_with("331"));
    assert!(client.cmd("PASS guest@example.com").await.starts_with("230"));
    assert_eq!(client.pwd().await, "/");
    assert!(client.cmd("QUIT").await.starts_with("221"));
    assert!(client.is_closed().await);
}

#[tokio::test]
async fn test_commands_before_login_are_refused() {
    let server = TestServer::start("").await;
    let mut client = Client::greeted(server.addr).await;

    for cmd in ["PWD", "SYST", "LIST", "FOO bar", "CWD /"] {
        let reply = client.cmd(cmd).await;
        assert!(reply.starts_with("530"), "{} answered {}", cmd, reply);
    }
    assert!(client.cmd("PASS nobody").await.starts_with("503"));
    assert!(client.cmd("USER").await.starts_with("501"));
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user() {
    let server = TestServer::start("").await;
    let mut client = Client::greeted(server.addr).await;

    client.cmd("USER alice").await;
    assert!(client.cmd("PASS wrong").await.starts_with("530"));
    client.cmd("USER mallory").await;
    assert!(client.cmd("PASS anything").await.starts_with("530"));
    assert!(client.cmd("PWD").await.starts_with("530"));
}

#[tokio::test]
async fn test_user_after_login_is_refused() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;
    assert!(client.cmd("USER anonymous").await.starts_with("530"));
    assert!(client.cmd("PASS x").await.starts_with("530"));
}

#[tokio::test]
async fn test_cwd_to_missing_directory_keeps_position() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;

    assert!(client.cmd("CWD docs").await.starts_with("250"));
    assert!(client.cmd("CWD /nonexistent").await.starts_with("550"));
    assert_eq!(client.pwd().await, "/docs");
    assert!(client.cmd("CWD ../../..").await.starts_with("550"));
    assert_eq!(client.pwd().await, "/docs");
}

#[tokio::test]
async fn test_cdup_clamps_at_root() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;

    assert!(client.cmd("CWD docs").await.starts_with("250"));
    assert!(client.cmd("CDUP").await.starts_with("250"));
    for _ in 0..3 {
        assert!(client.cmd("CDUP").await.starts_with("550"));
        assert_eq!(client.pwd().await, "/");
    }
}

#[tokio::test]
async fn test_mount_is_shown_under_its_virtual_prefix() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;

    assert!(client.cmd("CWD media").await.starts_with("250"));
    assert!(client.cmd("CWD music").await.starts_with("250"));
    assert_eq!(client.pwd().await, "/music");
    assert!(client.cmd("CWD jazz").await.starts_with("250"));
    assert_eq!(client.pwd().await, "/music/jazz");
    assert!(client.cmd("CWD /docs").await.starts_with("250"));
    assert_eq!(client.pwd().await, "/docs");
}

#[tokio::test]
async fn test_passive_list_and_nlst() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "anonymous", "x").await;

    let data = client.passive().await;
    assert!(client.cmd("LIST").await.starts_with("150"));
    let listing = String::from_utf8(read_all(data).await).unwrap();
    assert!(client.reply().await.starts_with("226"));
    assert!(listing.contains("readme.txt"));
    assert!(listing.lines().all(|l| l.starts_with('-') || l.starts_with('d')));

    let data = client.passive().await;
    assert!(client.cmd("NLST").await.starts_with("150"));
    let names = String::from_utf8(read_all(data).await).unwrap();
    assert!(client.reply().await.starts_with("226"));
    assert_eq!(names.trim_end(), "readme.txt");
}

#[tokio::test]
async fn test_transfer_without_data_channel() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;

    assert!(client.cmd("LIST").await.starts_with("425"));
    assert!(client.cmd("RETR anything").await.starts_with("425"));
    assert!(client.cmd("STOR").await.starts_with("501"));
}

#[tokio::test]
async fn test_port_with_foreign_address_is_refused() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;

    assert!(client.cmd("PORT 10,0,0,1,4,1").await.starts_with("550"));
    assert!(client.cmd("PORT 127,0,0,1,0,21").await.starts_with("501"));
    assert!(client.cmd("PORT garbage").await.starts_with("501"));
    assert!(client.cmd("LIST").await.starts_with("425"));
}

#[tokio::test]
async fn test_active_mode_retrieval() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "anonymous", "x").await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let reply = client
        .cmd(&format!("PORT 127,0,0,1,{},{}", port >> 8, port & 0xff))
        .await;
    assert!(reply.starts_with("200"), "unexpected PORT reply: {}", reply);
    let (data, _) = listener.accept().await.unwrap();

    assert!(client.cmd("RETR readme.txt").await.starts_with("150"));
    assert_eq!(read_all(data).await, b"read me\n");
    assert!(client.reply().await.starts_with("226"));
}

#[tokio::test]
async fn test_store_and_retrieve_round_trip() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;
    assert!(client.cmd("TYPE I").await.starts_with("200"));

    let large: Vec<u8> = (0..1_500_000u32).map(|i| (i % 251) as u8).collect();
    for (name, payload) in [
        ("empty.bin", Vec::new()),
        ("small.txt", b"hello world\r\n".to_vec()),
        ("large.bin", large),
    ] {
        upload(&mut client, name, &payload).await;
        assert_eq!(std::fs::read(server.path("alice").join(name)).unwrap(), payload);
        assert_eq!(download(&mut client, name).await, payload);

        let size = client.cmd(&format!("SIZE {}", name)).await;
        assert_eq!(size.trim_end(), format!("213 {}", payload.len()));
    }
}

#[tokio::test]
async fn test_rename_flow() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;
    std::fs::write(server.path("alice/old.txt"), b"x").unwrap();

    assert!(client.cmd("RNTO new.txt").await.starts_with("503"));
    assert!(client.cmd("RNFR old.txt").await.starts_with("350"));
    assert!(client.cmd("RNTO docs/new.txt").await.starts_with("250"));
    assert!(server.path("alice/docs/new.txt").exists());
    assert!(!server.path("alice/old.txt").exists());
    assert!(client.cmd("RNTO again.txt").await.starts_with("503"));
    assert!(client.cmd("RNFR missing.txt").await.starts_with("550"));
}

#[tokio::test]
async fn test_directory_management() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;

    assert!(client.cmd("MKD reports").await.starts_with("257"));
    assert!(server.path("alice/reports").is_dir());
    assert!(client.cmd("MKD ../escape").await.starts_with("550"));
    assert!(client.cmd("RMD reports").await.starts_with("250"));
    assert!(!server.path("alice/reports").exists());

    std::fs::write(server.path("alice/trash.txt"), b"x").unwrap();
    assert!(client.cmd("DELE trash.txt").await.starts_with("250"));
    assert!(client.cmd("DELE trash.txt").await.starts_with("550"));
}

#[tokio::test]
async fn test_download_only_account() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "anonymous", "x").await;

    let _data = client.passive().await;
    assert!(client.cmd("STOR upload.txt").await.starts_with("550"));
    assert!(!server.path("pub/upload.txt").exists());
    assert!(client.cmd("MKD newdir").await.starts_with("550"));
    assert!(client.cmd("DELE readme.txt").await.starts_with("550"));

    assert_eq!(download(&mut client, "readme.txt").await, b"read me\n");
}

#[tokio::test]
async fn test_upload_only_account() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "dropbox", "letmein").await;

    let _data = client.passive().await;
    assert!(client.cmd("RETR secret.txt").await.starts_with("550"));

    upload(&mut client, "incoming.txt", b"payload").await;
    assert_eq!(std::fs::read(server.path("drop/incoming.txt")).unwrap(), b"payload");
}

#[tokio::test]
async fn test_overlong_argument_disconnects() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;

    client.send(&format!("CWD {}", "a".repeat(200))).await;
    assert!(client.is_closed().await);
}

#[tokio::test]
async fn test_disabled_command_is_unknown() {
    let server = TestServer::start_with_tables("", "[commands]\nSYST = false").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;

    assert!(client.cmd("SYST").await.starts_with("500"));
    assert!(client.cmd("NOOP").await.starts_with("200"));
}

#[tokio::test]
async fn test_informational_commands() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;

    assert!(client.cmd("SYST").await.starts_with("215"));
    let feat = client.cmd("FEAT").await;
    assert!(feat.starts_with("211-"));
    assert!(feat.contains("SIZE"));
    assert!(client.cmd("TYPE X").await.starts_with("501"));
    assert!(client.cmd("ALLO 100").await.starts_with("202"));
    assert!(client.cmd("XYZZY").await.starts_with("500"));
}

#[tokio::test]
async fn test_abor_ends_session() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;

    assert!(client.cmd("ABOR").await.starts_with("226"));
    assert!(client.is_closed().await);
}

#[tokio::test]
async fn test_idle_timeout() {
    let server = TestServer::start("idle_timeout = 1").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;

    let reply = client.reply().await;
    assert!(reply.starts_with("421"), "unexpected reply: {}", reply);
    assert!(client.is_closed().await);
}

#[tokio::test]
async fn test_connection_limit() {
    let server = TestServer::start("max_connections = 1").await;
    let _first = Client::greeted(server.addr).await;

    let mut second = Client::connect(server.addr).await;
    assert!(second.reply().await.starts_with("421"));
}

#[tokio::test]
async fn test_shutdown_notifies_sessions() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;

    server.shutdown.cancel();
    assert!(client.reply().await.starts_with("421"));
}

#[tokio::test]
async fn test_denied_address_is_dropped() {
    let server = TestServer::start_with_tables("", "[acl]\ndeny = [\"127.0.0.0/8\"]").await;
    let mut client = Client::connect(server.addr).await;
    assert!(client.is_closed().await);
}

#[tokio::test]
async fn test_cdup_with_overlong_argument_disconnects() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;

    client.send(&format!("CDUP {}", "a".repeat(200))).await;
    assert!(client.is_closed().await);
}

#[tokio::test]
async fn test_passive_accept_timeout_closes_listener() {
    let server = TestServer::start("pasv_timeout = 1").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;

    let endpoint = client.passive_endpoint().await;
    assert!(client.cmd("LIST").await.starts_with("425"));
    assert!(listener_closed(endpoint).await);
    assert!(client.cmd("LIST").await.starts_with("425"));
}

#[tokio::test]
async fn test_second_pasv_discards_first_listener() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "anonymous", "x").await;

    let first = client.passive_endpoint().await;
    let data = client.passive().await;
    assert!(listener_closed(first).await);

    assert!(client.cmd("NLST").await.starts_with("150"));
    assert_eq!(read_all(data).await, b"readme.txt\r\n");
    assert!(client.reply().await.starts_with("226"));
}

#[tokio::test]
async fn test_port_discards_pending_passive_listener() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "anonymous", "x").await;

    let passive = client.passive_endpoint().await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let reply = client
        .cmd(&format!("PORT 127,0,0,1,{},{}", port >> 8, port & 0xff))
        .await;
    assert!(reply.starts_with("200"), "unexpected PORT reply: {}", reply);
    assert!(listener_closed(passive).await);
}

#[tokio::test]
async fn test_failed_upload_removes_partial_file() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;

    let mut data = client.passive().await;
    assert!(client.cmd("STOR broken.bin").await.starts_with("150"));
    data.write_all(&[7u8; 4096]).await.unwrap();
    // Zero linger turns the close into a reset, so the server sees an error, not EOF.
    data.set_linger(Some(Duration::ZERO)).unwrap();
    drop(data);

    let reply = client.reply().await;
    assert!(reply.starts_with("550"), "unexpected reply: {}", reply);
    assert!(!server.path("alice/broken.bin").exists());
}

#[tokio::test]
async fn test_shutdown_during_upload_removes_partial_file() {
    let server = TestServer::start("").await;
    let mut client = Client::login(server.addr, "alice", "wonderland").await;

    let mut data = client.passive().await;
    assert!(client.cmd("STOR part.bin").await.starts_with("150"));
    data.write_all(&[1u8; 10_000]).await.unwrap();
    assert!(server.path("alice/part.bin").exists());

    server.shutdown.cancel();
    assert!(client.reply().await.starts_with("421"));
    assert!(!server.path("alice/part.bin").exists());
}
