use chrono::Local;
use myweather_core::{
    AuthorizationStatus, FetchError, Prompt, WeatherDetail, WeatherDisplay, WeatherRecord,
};

/// Renders records and prompts as plain text.
#[derive(Debug, Default)]
pub struct TerminalDisplay {
    notices: usize,
}

impl TerminalDisplay {
    /// Whether a prompt or status notice was shown instead of weather.
    pub fn notified(&self) -> bool {
        self.notices > 0
    }
}

impl WeatherDisplay for TerminalDisplay {
    fn render(&mut self, record: &WeatherRecord) {
        println!("{}", format_record(record));
    }

    fn prompt(&mut self, prompt: Prompt) {
        self.notices += 1;
        eprintln!("{}", prompt_message(prompt));
    }

    fn fetch_failed(&mut self, error: &FetchError) {
        eprintln!("날씨 정보를 가져오지 못했습니다: {error}");
    }

    fn unsupported_status(&mut self, status: AuthorizationStatus) {
        self.notices += 1;
        eprintln!("{}", unsupported_message(status));
    }
}

pub fn prompt_message(prompt: Prompt) -> &'static str {
    match prompt {
        Prompt::ServicesDisabled => "기기의 위치 서비스가 꺼져 있습니다. 설정에서 위치 서비스를 켜주세요",
        Prompt::OpenSettings => "설정에서 위치 권한 사용에 대하여 허용해주세요",
    }
}

pub fn unsupported_message(status: AuthorizationStatus) -> String {
    format!("위치 권한 상태({status})에서는 현재 위치를 사용할 수 없습니다")
}

pub fn format_record(record: &WeatherRecord) -> String {
    let mut out = format!(
        "📍 {}\n{}\n{}\n",
        record.location_name, record.description, record.icon_url
    );

    for detail in WeatherDetail::all() {
        out.push_str(&format!("  {:<8} {}\n", detail.title(), detail.format(record)));
    }

    out.push_str(&format!(
        "  ({})",
        record.fetched_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    ));
    out
}
