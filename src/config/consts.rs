// src/config/consts.rs

// Portal
pub const LOGIN_URL: &str = "https://canaime.com.br/sgp2rr/login/login_principal.php";
pub const ROSTER_URL: &str =
    "https://canaime.com.br/sgp2rr/areas/impressoes/UND_ChamadaFOTOS_todos2.php?id_und_prisional=PAMC";
pub const CADASTRAL_URL_TMPL: &str =
    "https://canaime.com.br/sgp2rr/areas/unidades/cadastro.php?id_cad_preso={id}";
pub const DESCRIPTIVE_URL_TMPL: &str =
    "https://canaime.com.br/sgp2rr/areas/unidades/Informes_LER.php?id_cad_preso={id}";

// Net
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/125.0 Safari/537.36";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Roster markup
pub const MARKER_CLASS: &str = "titulobkSingCAPS";
pub const ID_PREFIX_LEN: usize = 3; // "ID:" style label before the code
pub const WING_PREFIX_LEN: usize = 5; // "Ala: " style label before "wing/cell"

// Login form heuristics, in priority order
pub const USERNAME_CANDIDATES: &[&str] = &["usuario", "username", "login", "user", "usr"];
pub const PASSWORD_CANDIDATES: &[&str] = &["senha", "password", "passwd", "pass", "pwd"];

// Auth check: a page mentioning this after login means we got bounced
pub const LOGIN_TOKEN: &str = "login";

// Worker <-> front end
pub const ANSWER_POLL_MS: u64 = 1_000;
pub const FRONT_POLL_MS: u64 = 100;
pub const CANCEL_GRACE_POLLS: u32 = 5;

// Output
pub const SUGGESTED_FILE_PREFIX: &str = "cara_cracha_";
pub const WING_TAG_MAX_CHARS: usize = 60;
pub const WING_TAG_FALLBACK: &str = "todas";
pub const ERROR_TRACE_PREVIEW: usize = 500;

// Local files
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";
pub const DEFAULT_LOG_FILTER: &str = "cara_cracha=info";
