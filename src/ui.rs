//! Interface de terminal do hostbook — barra de progresso e revisão passo a
//! passo.
//!
//! Usa a crate `indicatif` para a barra de progresso de lotes e `console`
//! para estilização com cores e leitura do terminal. O [`BatchProgress`]
//! espelha a porcentagem agregada do [`OperationTracker`] no terminal.

use std::sync::Arc;

use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use crate::batch::{BatchOutcome, OpPair, ReviewDecision, Reviewer, SaveOutcome};
use crate::sync::SyncReport;
use crate::tracker::OperationTracker;

/// Barra de progresso de um lote, alimentada pelo tracker compartilhado.
#[derive(Clone)]
pub struct BatchProgress {
    bar: ProgressBar,
    tracker: Arc<OperationTracker>,
}

impl BatchProgress {
    /// Inicia a barra (0..100) com a mensagem do lote.
    pub fn start(message: &str, tracker: Arc<OperationTracker>) -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.cyan/blue} {pos:>3}% {msg}")
                .expect("invalid template"),
        );
        bar.set_message(message.to_string());
        Self { bar, tracker }
    }

    /// Barra invisível para testes e saída não interativa.
    pub fn hidden(tracker: Arc<OperationTracker>) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            tracker,
        }
    }

    /// Reposiciona a barra conforme a porcentagem atual do tracker.
    pub fn refresh(&self) {
        self.bar.set_position(u64::from(self.tracker.percent()));
    }

    /// Encerra e limpa a barra.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Revisor interativo: mostra cada mensagem e pergunta o que fazer.
pub struct ConsoleReviewer {
    term: Term,
    cyan: Style,
    dim: Style,
}

impl ConsoleReviewer {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            cyan: Style::new().cyan().bold(),
            dim: Style::new().dim(),
        }
    }

    fn prompt(&self, label: &str) -> Option<String> {
        let _ = self.term.write_str(label);
        self.term.read_line().ok()
    }

    // Campo opcional: entrada vazia mantém o valor rascunhado.
    fn optional(&self, label: &str) -> Option<String> {
        let answer = self.prompt(label)?;
        let trimmed = answer.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

impl Default for ConsoleReviewer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reviewer for ConsoleReviewer {
    fn review(&mut self, pair: &OpPair) -> ReviewDecision {
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "{} {}",
            self.cyan.apply_to("Draft for"),
            pair.candidate
        ));
        let _ = self
            .term
            .write_line(&format!("  Subject: {}", pair.message.subject));
        let _ = self
            .term
            .write_line(&format!("  To:      {}", pair.message.to.join(", ")));
        if !pair.message.cc.is_empty() {
            let _ = self
                .term
                .write_line(&format!("  Cc:      {}", pair.message.cc.join(", ")));
        }
        let _ = self
            .term
            .write_line(&format!("{}", self.dim.apply_to(&pair.message.html_body)));

        loop {
            let answer = match self.prompt("[enter] send  [e]dit  [s]kip  [a]ll remaining: ") {
                Some(a) => a,
                // Sem terminal utilizável: não enviar nada sem confirmação.
                None => return ReviewDecision::SkipAll,
            };
            match answer.trim().to_lowercase().as_str() {
                "" | "y" | "send" => return ReviewDecision::Confirm,
                "e" | "edit" => {
                    return ReviewDecision::ConfirmEdited {
                        to: self.optional("  To [keep draft]: "),
                        cc: self.optional("  Cc [keep draft]: "),
                        body: self.optional("  Body [keep draft]: "),
                    };
                }
                "s" | "skip" => return ReviewDecision::Skip,
                "a" | "all" => return ReviewDecision::SkipAll,
                _ => {}
            }
        }
    }
}

/// Pergunta sim/não antes de um envio sem revisão individual.
pub fn confirm(question: &str) -> bool {
    let term = Term::stdout();
    let _ = term.write_str(&format!("{question} [y/N] "));
    matches!(term.read_line(), Ok(answer) if answer.trim().eq_ignore_ascii_case("y"))
}

/// Imprime o resumo de uma sincronização.
pub fn print_report(report: &SyncReport) {
    let green = Style::new().green().bold();
    if report.promoted > 0 {
        println!(
            "  {} {} new intake row(s) promoted",
            green.apply_to("+"),
            report.promoted
        );
    }
    for (kind, count) in report.counts {
        println!("  {:<10} {count}", format!("{kind}:"));
    }
}

/// Mostra os avisos de data não interpretável, oferecendo suprimir o resto
/// após algumas ocorrências seguidas.
pub fn report_date_warnings(warnings: &[String], threshold: usize) {
    if warnings.is_empty() {
        return;
    }
    let term = Term::stderr();
    let yellow = Style::new().yellow();
    let threshold = threshold.max(1);

    for (i, warning) in warnings.iter().enumerate() {
        let _ = term.write_line(&format!("  {} {warning}", yellow.apply_to("!")));
        let shown = i + 1;
        if shown % threshold == 0 && shown < warnings.len() {
            let _ = term.write_str("Suppress the remaining date warnings? [y/N] ");
            match term.read_line() {
                Ok(answer) if answer.trim().eq_ignore_ascii_case("y") => {
                    let _ = term.write_line(&format!(
                        "  {} warning(s) suppressed",
                        warnings.len() - shown
                    ));
                    return;
                }
                Ok(_) => {}
                Err(_) => return,
            }
        }
    }
}

/// Imprime o resultado de um lote de notificações.
pub fn print_outcome(outcome: &BatchOutcome) {
    let green = Style::new().green().bold();
    let red = Style::new().red().bold();
    let yellow = Style::new().yellow();

    if !outcome.delivered.is_empty() {
        println!(
            "  {} {} notification(s) delivered",
            green.apply_to("✓"),
            outcome.delivered.len()
        );
    }
    for (candidate, error) in &outcome.send_failures {
        println!(
            "  {} send to {candidate} failed, status left untouched: {error}",
            red.apply_to("✗")
        );
    }
    for (candidate, error) in &outcome.write_failures {
        println!(
            "  {} delivered to {candidate} but the status write failed: {error}",
            red.apply_to("✗")
        );
    }
    if outcome.cancelled > 0 {
        println!(
            "  {} {} candidate(s) skipped",
            yellow.apply_to("↷"),
            outcome.cancelled
        );
    }
}

/// Imprime o resultado de um lote somente de escrita.
pub fn print_save_outcome(outcome: &SaveOutcome) {
    let green = Style::new().green().bold();
    let red = Style::new().red().bold();
    if outcome.failures.is_empty() {
        println!(
            "  {} {} cell(s) written",
            green.apply_to("✓"),
            outcome.written
        );
    }
    for failure in &outcome.failures {
        println!("  {} write failed: {failure}", red.apply_to("✗"));
    }
}

/// Imprime o registro do lote formatado em JSON (modo verboso).
pub fn print_audit(outcome: &BatchOutcome) {
    println!();
    println!("─── Batch Record ───");
    println!(
        "{}",
        serde_json::to_string_pretty(outcome).unwrap_or_default()
    );
}
