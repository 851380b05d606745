//! Terminal front end for the quiz loop and the maintenance commands.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::task::JoinHandle;

use aid_core::model::{Difficulty, Question, Theme, Topic, UserState};
use aid_core::WeaknessAnalyzer;
use services::assistant::SUGGESTED_PROMPTS;
use services::{
    AdvanceResult, AppServices, ChatSession, SessionError, SessionMode, SessionReport,
    SessionState,
};

type AppResult = Result<(), Box<dyn std::error::Error>>;

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

fn option_label(index: usize) -> char {
    OPTION_LABELS.get(index).copied().unwrap_or('?')
}

enum Input {
    Choice(usize),
    Quit,
}

fn parse_choice(line: &str, options: usize) -> Option<Input> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
        return Some(Input::Quit);
    }
    if let Ok(n) = line.parse::<usize>() {
        return (1..=options).contains(&n).then(|| Input::Choice(n - 1));
    }
    let mut chars = line.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    OPTION_LABELS
        .iter()
        .take(options)
        .position(|l| l.eq_ignore_ascii_case(&c))
        .map(Input::Choice)
}

/// Run one interactive session reading answers from `input`.
///
/// # Errors
///
/// Propagates session and I/O errors other than an empty candidate pool.
pub async fn run_quiz<R>(services: &AppServices, mode: SessionMode, input: R) -> AppResult
where
    R: AsyncRead + Unpin,
{
    let loop_service = services.session_loop();
    let mut state = SessionState::NotStarted;
    match loop_service.start(&mut state, mode).await {
        Ok(()) => {}
        Err(SessionError::NoQuestionsAvailable) => {
            println!("{}", no_questions_message(mode));
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    let mut lines = BufReader::new(input).lines();
    while let Some(session) = state.session() {
        let question = session.current_question().clone();
        let progress = session.progress();
        let image = services
            .ai_enabled()
            .then(|| services.images().spawn_prefetch(question.clone()));

        println!();
        println!(
            "[{}/{}] {} · {}",
            progress.position(),
            progress.total,
            question.topic(),
            question.difficulty()
        );
        print_question(&question);

        let Some(selected) = read_choice(&mut lines, question.options().len()).await? else {
            loop_service.abandon(&mut state);
            println!("Sınav yarıda bırakıldı. İstatistikler güncellenmedi.");
            return Ok(());
        };

        let feedback = loop_service.answer(&mut state, selected)?;
        if feedback.correct {
            println!("Doğru!");
        } else {
            println!(
                "Yanlış. Doğru cevap: {}) {}",
                option_label(feedback.correct_answer),
                question.options()[feedback.correct_answer]
            );
        }
        if !feedback.explanation.is_empty() {
            println!("Açıklama: {}", feedback.explanation);
        }
        if let Some(handle) = image {
            show_image(handle).await;
        }

        let advanced = match loop_service.advance(&mut state).await {
            Err(SessionError::Storage(err)) if state.is_unsaved() => {
                tracing::warn!(error = %err, "retrying session write");
                println!("Sonuçlar kaydedilemedi, tekrar deneniyor...");
                loop_service.advance(&mut state).await?
            }
            other => other?,
        };
        if let AdvanceResult::Finished(report) = advanced {
            print_report(&report);
        }
    }
    Ok(())
}

fn no_questions_message(mode: SessionMode) -> &'static str {
    match mode {
        SessionMode::Weakness => {
            "Harika! Şu an belirgin bir zayıf konun yok. Önce birkaç test çözmelisin."
        }
        SessionMode::ByTopic(Topic::PdfExam) => {
            "Henüz içe aktarılmış soru yok. `import <dosya>` ile soru ekleyebilirsin."
        }
        _ => "Bu modda çözülecek soru bulunamadı.",
    }
}

fn print_question(question: &Question) {
    println!("{}", question.text());
    for (index, option) in question.options().iter().enumerate() {
        println!("  {}) {option}", option_label(index));
    }
}

async fn read_choice<R>(lines: &mut Lines<BufReader<R>>, options: usize) -> Result<Option<usize>, std::io::Error>
where
    R: AsyncRead + Unpin,
{
    loop {
        println!("Cevabın (A-D, çıkmak için q):");
        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        match parse_choice(&line, options) {
            Some(Input::Choice(index)) => return Ok(Some(index)),
            Some(Input::Quit) => return Ok(None),
            None => println!("Geçersiz seçim."),
        }
    }
}

async fn show_image(handle: JoinHandle<Option<String>>) {
    if !handle.is_finished() {
        handle.abort();
        return;
    }
    match handle.await {
        Ok(Some(url)) if url.starts_with("data:") => {
            println!("(Senaryo görseli hazır, {} bayt)", url.len());
        }
        Ok(Some(url)) => println!("Görsel: {url}"),
        Ok(None) | Err(_) => {}
    }
}

fn print_report(report: &SessionReport) {
    let summary = &report.summary;
    println!();
    println!(
        "Sonuç: {}/{} doğru (%{})",
        summary.correct_count(),
        summary.total_questions(),
        summary.percentage()
    );
    if summary.is_success() {
        println!("Tebrikler, başarılı oldun!");
    } else {
        println!("Biraz daha çalışman gerekiyor.");
    }
    if !report.weak_topics.is_empty() {
        let labels: Vec<&str> = report.weak_topics.iter().map(|t| t.label()).collect();
        println!("Tekrar etmen gereken konular: {}", labels.join(", "));
    }
}

/// # Errors
///
/// Returns storage errors from loading the performance store.
pub async fn show_stats(services: &AppServices) -> AppResult {
    let state = services.performance().load().await?;
    print_stats(&state, &WeaknessAnalyzer::default());
    Ok(())
}

fn print_stats(state: &UserState, analyzer: &WeaknessAnalyzer) {
    println!("Tamamlanan test: {}", state.total_quizzes());
    println!("Cevaplanan soru: {}", state.total_questions_answered());
    if let Some(accuracy) = state.overall_accuracy() {
        println!("Genel başarı: %{:.0}", accuracy * 100.0);
    }
    println!();
    for (topic, stat) in state.topic_stats().iter() {
        if topic.is_import_only() && stat.is_empty() {
            continue;
        }
        println!(
            "  {:<28} {:>3}/{:<3} %{}",
            topic.label(),
            stat.correct(),
            stat.total(),
            stat.percentage()
        );
    }
    let weak = analyzer.weak_topics(state.topic_stats());
    if !weak.is_empty() {
        let labels: Vec<&str> = weak.iter().map(|t| t.label()).collect();
        println!();
        println!("Zayıf konular: {}", labels.join(", "));
    }
    if state.has_custom_questions() {
        println!("İçe aktarılmış soru: {}", state.custom_questions().len());
    }
}

/// # Errors
///
/// Returns I/O errors reading `path` and import failures.
pub async fn import_file(services: &AppServices, path: &std::path::Path) -> AppResult {
    let content = tokio::fs::read_to_string(path).await?;
    let report = services.imports().import_text(&content).await?;
    println!(
        "{} soru eklendi ({} geçersiz soru atlandı).",
        report.added, report.rejected
    );
    Ok(())
}

/// # Errors
///
/// Returns generation or storage failures.
pub async fn generate(services: &AppServices, topic: Topic, difficulty: Difficulty) -> AppResult {
    let question = services.imports().generate_for_topic(topic, difficulty).await?;
    println!("Yeni soru eklendi ({}):", question.id());
    print_question(&question);
    println!(
        "Doğru cevap: {}) {}",
        option_label(question.correct_answer()),
        question.options()[question.correct_answer()]
    );
    Ok(())
}

pub async fn ask(services: &AppServices, message: &str) {
    let assistant = services.assistant();
    if message.trim().is_empty() {
        println!("Örnek sorular:");
        for prompt in SUGGESTED_PROMPTS {
            println!("  - {prompt}");
        }
        return;
    }
    if !assistant.is_enabled() {
        println!("Asistan için API anahtarı gerekli (`set-key <anahtar>`).");
        return;
    }
    let mut chat = ChatSession::new();
    if let Some(reply) = assistant.send(&mut chat, message).await {
        println!("{}", reply.text);
    }
}

/// # Errors
///
/// Returns storage errors.
pub async fn set_key(services: &AppServices, key: &str) -> AppResult {
    if key.trim().is_empty() {
        services.clear_api_key().await?;
        println!("API anahtarı silindi.");
    } else {
        services.save_api_key(key).await?;
        println!("API anahtarı kaydedildi.");
    }
    Ok(())
}

/// # Errors
///
/// Returns storage errors.
pub async fn set_theme(services: &AppServices, theme: Theme) -> AppResult {
    let state = services.performance().set_theme(theme).await?;
    println!("Tema: {:?}", state.theme());
    Ok(())
}
