use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Ru,
}

impl Lang {
    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ru => "ru",
        }
    }
}

/// Translate a key to the given language.
pub fn t(lang: Lang, key: &str) -> &'static str {
    let ru = lang == Lang::Ru;
    match key {
        // ── Object list ─────────────────────────────────────
        "objects.group" => if ru { "Группа #{group_nr}" } else { "Group #{group_nr}" },
        "objects.empty" => if ru { "Объектов нет." } else { "No objects on this build plate." },
        "objects.outside" => if ru { "Вне области печати" } else { "Outside build area" },
        "objects.selected" => if ru { "выбран" } else { "selected" },
        "objects.plate" => if ru { "Стол" } else { "Build plate" },

        _ => "???",
    }
}

/// Label of the `group_nr`-th group in the object list
pub fn group_label(lang: Lang, group_nr: usize) -> String {
    t(lang, "objects.group").replace("{group_nr}", &group_nr.to_string())
}
