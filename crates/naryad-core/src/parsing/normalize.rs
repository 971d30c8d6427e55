use std::collections::HashMap;
use std::sync::LazyLock;

use crate::model::WorkType;

/// A raw work-type phrase and the canonical labels it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizationEntry {
    pub pattern: &'static str,
    pub short: &'static str,
    pub full: &'static str,
}

const fn entry(
    pattern: &'static str,
    short: &'static str,
    full: &'static str,
) -> NormalizationEntry {
    NormalizationEntry {
        pattern,
        short,
        full,
    }
}

/// Work-type phrases as they appear in the dispatcher's export.
pub const ENTRIES: &[NormalizationEntry] = &[
    // Metering
    entry("замена пу", "Замена ПУ", "Замена прибора учета электроэнергии"),
    entry(
        "замена прибора учета",
        "Замена ПУ",
        "Замена прибора учета электроэнергии",
    ),
    entry(
        "установка прибора учета",
        "Установка ПУ",
        "Установка прибора учета электроэнергии",
    ),
    entry(
        "проверка прибора учета",
        "Проверка ПУ",
        "Проверка прибора учета электроэнергии",
    ),
    entry(
        "снятие показаний",
        "Показания",
        "Снятие контрольных показаний прибора учета",
    ),
    entry("опломбировка", "Пломбировка", "Опломбирование прибора учета"),
    entry("опломбирование", "Пломбировка", "Опломбирование прибора учета"),
    // Supply
    entry(
        "отключение",
        "Отключение",
        "Отключение электроустановки потребителя",
    ),
    entry(
        "отключение за неуплату",
        "Откл. неуплата",
        "Отключение электроустановки потребителя за неуплату",
    ),
    entry(
        "подключение",
        "Подключение",
        "Подключение электроустановки потребителя",
    ),
    entry(
        "возобновление подачи",
        "Подключение",
        "Возобновление подачи электроэнергии потребителю",
    ),
    entry(
        "ограничение",
        "Ограничение",
        "Введение ограничения режима потребления электроэнергии",
    ),
    // Inspection
    entry(
        "технический осмотр",
        "Тех. осмотр",
        "Технический осмотр электроустановки",
    ),
    entry(
        "проверка схемы подключения",
        "Проверка схемы",
        "Проверка схемы подключения прибора учета",
    ),
];

static INDEX: LazyLock<HashMap<String, &'static NormalizationEntry>> = LazyLock::new(|| {
    ENTRIES
        .iter()
        .map(|entry| (lookup_key(entry.pattern), entry))
        .collect()
});

/// Lowercase and collapse inner whitespace.
fn lookup_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Find the table entry for a raw work-type phrase, if any.
pub fn lookup(raw: &str) -> Option<&'static NormalizationEntry> {
    INDEX.get(&lookup_key(raw)).copied()
}

/// Map a raw work-type phrase to its canonical (short, full) labels.
///
/// Phrases the table does not know are returned unchanged as both labels.
pub fn normalize_work_type(raw: &str) -> WorkType {
    match lookup(raw) {
        Some(entry) => WorkType {
            short: entry.short.to_string(),
            full: entry.full.to_string(),
        },
        None => WorkType::verbatim(raw),
    }
}
