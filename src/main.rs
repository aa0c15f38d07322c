mod config;
mod corpus;
mod embedding;
mod llm;
mod persona;
mod prompt;
mod retriever;
mod session;
mod translate;

use anyhow::Result;
use config::Config;
use corpus::Corpus;
use persona::{
    resolve_model, Philosopher, ResponseLength, ALL_PHILOSOPHERS, AVAILABLE_MODELS,
    DEFAULT_MODEL_LABEL,
};
use retriever::Retriever;
use session::{ChatSession, RemoteBackend};
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn print_controls() {
    let names: Vec<&str> = ALL_PHILOSOPHERS.iter().map(|p| p.display_name()).collect();
    let mut models: Vec<&str> = AVAILABLE_MODELS.keys().copied().collect();
    models.sort_unstable();
    println!("👨‍🏫 철학자 선택: /philosopher <{}>", names.join("|"));
    println!(
        "🗣️ 답변 길이: /length <short|long> ({} / {})",
        ResponseLength::Short.label(),
        ResponseLength::Long.label()
    );
    println!("🤖 사용할 모델: /model <{}>", models.join("|"));
    println!("대화 다시 시작하기: /reset (페르소나 설정은 새 세션에서만 복원됩니다)");
    println!("종료: /quit");
}

fn handle_command(session: &mut ChatSession, line: &str) -> bool {
    let mut parts = line.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let argument = parts.next().unwrap_or_default().trim();

    match command {
        "/philosopher" => match argument.parse::<Philosopher>() {
            Ok(p) => {
                session.set_philosopher(p);
                println!("👨‍🏫 선택된 철학자: {p}");
            }
            Err(e) => println!("{e}"),
        },
        "/length" => match argument.parse::<ResponseLength>() {
            Ok(len) => {
                session.set_length(len);
                println!("🗣️ {}", len.label());
            }
            Err(e) => println!("{e}"),
        },
        "/model" => match resolve_model(argument) {
            Ok(model) => {
                session.set_model(model);
                println!("🤖 선택된 모델: {model}");
            }
            Err(e) => println!("{e}"),
        },
        "/reset" => {
            session.reset();
            println!("대화 로그를 비웠습니다.");
        }
        "/help" => print_controls(),
        "/quit" | "/exit" => return false,
        other => println!("알 수 없는 명령입니다: {other} (/help 참고)"),
    }
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Fails fast here when either API credential is missing.
    let cfg = Config::from_env()?;

    println!("🧔📚 철학자와 대화하기");
    println!("Loading corpus (first run downloads the table)...");
    let corpus = Corpus::load(&cfg).await?;
    let retriever = Retriever::new(&corpus);

    let backend = RemoteBackend::new(&cfg)?;
    let mut session = ChatSession::start(
        &backend,
        Philosopher::Nietzsche,
        ResponseLength::Short,
        resolve_model(DEFAULT_MODEL_LABEL)?,
        &cfg.model_lang,
        &cfg.display_lang,
    )
    .await?;

    println!("안녕하세요! 환영합니다. 철학자와 대화를 시작해 보세요!");
    print_controls();

    loop {
        let mut line = String::new();
        print!("{}에게 고민을 말해보세요> ", session.philosopher());
        std::io::stdout().flush()?;

        if std::io::stdin().read_line(&mut line)? == 0 {
            break; // EOF (Ctrl+D)
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('/') {
            if !handle_command(&mut session, line) {
                break;
            }
            continue;
        }

        match session.submit(&backend, &retriever, line).await {
            Ok(true) => println!("\n{}", session.render()),
            Ok(false) => {}
            Err(e) => eprintln!("Error: {e:#}\n"),
        }
    }

    Ok(())
}
