//! Configuração do hostbook carregada a partir de `hostbook.toml`.
//!
//! A struct [`HostbookConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis. As variáveis de
//! ambiente `HOSTBOOK_STORE_TOKEN` e `HOSTBOOK_MAILER_TOKEN` têm precedência
//! sobre o arquivo.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Configuração de nível superior carregada de `hostbook.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct HostbookConfig {
    /// Token de acesso ao repositório de planilhas.
    #[serde(default)]
    pub store_token: String,

    /// Token de acesso ao relay de e-mail.
    #[serde(default)]
    pub mailer_token: String,

    /// Planilha de presets (B1:B5 da primeira aba). Quando presente, define a
    /// planilha rastreada e os corpos dos e-mails.
    #[serde(default)]
    pub presets_spreadsheet_id: String,

    /// Planilha rastreada, usada quando não há planilha de presets.
    #[serde(default)]
    pub spreadsheet_id: String,

    /// URL base da API de planilhas.
    #[serde(default = "default_sheets_base_url")]
    pub sheets_base_url: String,

    /// URL base do relay de e-mail.
    #[serde(default)]
    pub mailer_base_url: String,

    /// Aba com as submissões brutas do formulário.
    #[serde(default = "default_intake_sheet")]
    pub intake_sheet: String,

    /// Aba com os registros rastreados por candidato.
    #[serde(default = "default_tracked_sheet")]
    pub tracked_sheet: String,

    /// Nome do remetente usado na tag de assinatura quando não informado na
    /// linha de comando.
    #[serde(default)]
    pub sender_name: String,

    /// Destinatários padrão do apelo por anfitriões.
    #[serde(default)]
    pub plea_recipients: Vec<String>,

    /// Avisos de data mostrados antes de oferecer supressão.
    #[serde(default = "default_date_warning_threshold")]
    pub date_warning_threshold: usize,
}

// Valor padrão da URL base da API de planilhas.
fn default_sheets_base_url() -> String {
    "https://sheets.googleapis.com/v4/spreadsheets".to_string()
}

// Aba padrão das submissões brutas.
fn default_intake_sheet() -> String {
    "Sheet1".to_string()
}

// Aba padrão dos registros rastreados.
fn default_tracked_sheet() -> String {
    "Sheet2".to_string()
}

// Avisos antes de oferecer supressão: 3.
fn default_date_warning_threshold() -> usize {
    3
}

impl Default for HostbookConfig {
    fn default() -> Self {
        Self {
            store_token: String::new(),
            mailer_token: String::new(),
            presets_spreadsheet_id: String::new(),
            spreadsheet_id: String::new(),
            sheets_base_url: default_sheets_base_url(),
            mailer_base_url: String::new(),
            intake_sheet: default_intake_sheet(),
            tracked_sheet: default_tracked_sheet(),
            sender_name: String::new(),
            plea_recipients: Vec::new(),
            date_warning_threshold: default_date_warning_threshold(),
        }
    }
}

impl HostbookConfig {
    /// Carrega a configuração do caminho informado, ou de `hostbook.toml` no
    /// diretório atual. Usa valores padrão se o arquivo não existir.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new("hostbook.toml"));
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<HostbookConfig>(&contents)?
        } else {
            Self::default()
        };

        // Variáveis de ambiente têm precedência sobre o arquivo para os tokens.
        if let Ok(token) = std::env::var("HOSTBOOK_STORE_TOKEN")
            && !token.is_empty()
        {
            config.store_token = token;
        }
        if let Ok(token) = std::env::var("HOSTBOOK_MAILER_TOKEN")
            && !token.is_empty()
        {
            config.mailer_token = token;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let config = HostbookConfig::default();
        assert_eq!(config.intake_sheet, "Sheet1");
        assert_eq!(config.tracked_sheet, "Sheet2");
        assert_eq!(config.date_warning_threshold, 3);
        assert!(config.store_token.is_empty());
        assert!(config.plea_recipients.is_empty());
        assert!(config.sheets_base_url.contains("sheets.googleapis.com"));
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            store_token = "tok-store"
            presets_spreadsheet_id = "spread-presets"
            tracked_sheet = "Candidates"
            plea_recipients = ["class-a@example.edu", "class-b@example.edu"]
        "#;
        let config: HostbookConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store_token, "tok-store");
        assert_eq!(config.presets_spreadsheet_id, "spread-presets");
        assert_eq!(config.tracked_sheet, "Candidates");
        assert_eq!(config.plea_recipients.len(), 2);
        // Campos ausentes mantêm os defaults.
        assert_eq!(config.intake_sheet, "Sheet1");
        assert_eq!(config.date_warning_threshold, 3);
    }

    #[test]
    fn load_reads_the_given_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "spreadsheet_id = \"spread-direct\"").unwrap();
        let config = HostbookConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.spreadsheet_id, "spread-direct");
    }

    #[test]
    fn load_falls_back_to_defaults_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("hostbook.toml");
        let config = HostbookConfig::load(Some(&missing)).unwrap();
        assert_eq!(config.tracked_sheet, "Sheet2");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "store_token = [not valid").unwrap();
        assert!(HostbookConfig::load(Some(file.path())).is_err());
    }
}
