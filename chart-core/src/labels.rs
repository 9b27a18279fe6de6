use serde::{Deserialize, Serialize};

/// UI language. Portuguese is the default; English is the only alternative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Pt,
    En,
}

impl Lang {
    /// Accepts tags such as `en`, `en-US`, `pt_BR`. Unknown tags fall back to Portuguese.
    pub fn parse(tag: &str) -> Lang {
        let t = tag.trim().to_ascii_lowercase();
        if t == "en" || t.starts_with("en-") || t.starts_with("en_") {
            Lang::En
        } else {
            Lang::Pt
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Lang::Pt => "pt",
            Lang::En => "en",
        }
    }
}

/// Every user-visible string of the converter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub title: String,
    pub subtitle: String,
    pub input_label: String,
    pub placeholder: String,
    pub clear: String,
    pub clear_aria: String,
    pub result_heading: String,
    pub show_chart: String,
    pub hide_chart: String,
    pub copy: String,
    pub copied: String,
    pub export_chart: String,
    pub size_header: String,
    pub diameter_header: String,
    pub footer_note: String,
    pub footer_rights: String,
}

impl Default for Labels {
    fn default() -> Self {
        Labels::for_lang(Lang::Pt)
    }
}

impl Labels {
    pub fn for_lang(lang: Lang) -> Labels {
        let s = |pt: &str, en: &str| -> String {
            match lang {
                Lang::Pt => pt.to_string(),
                Lang::En => en.to_string(),
            }
        };
        Labels {
            title: s("Conversor de Aro", "Ring Size Converter"),
            subtitle: s(
                "Insira o diâmetro interno em milímetros (mm) para encontrar o tamanho de aro correspondente.",
                "Enter the inner diameter in millimeters (mm) to find the matching ring size.",
            ),
            input_label: s("Diâmetro Interno (mm)", "Inner Diameter (mm)"),
            placeholder: s("Ex: 16.5", "e.g. 16.5"),
            clear: s("Limpar", "Clear"),
            clear_aria: s("Limpar diâmetro", "Clear diameter"),
            result_heading: s("Tamanho do Aro (BR)", "Ring Size (BR)"),
            show_chart: s("Ver Tabela de Medidas", "Show Size Chart"),
            hide_chart: s("Ocultar Tabela", "Hide Chart"),
            copy: s("Copiar", "Copy"),
            copied: s("Copiado!", "Copied!"),
            export_chart: s("Exportar Tabela (SVG)", "Export Chart (SVG)"),
            size_header: s("Aro (BR)", "Size (BR)"),
            diameter_header: s("Diâmetro (mm)", "Diameter (mm)"),
            footer_note: s("Desenvolvido para joalheiros.", "Built for jewelers."),
            footer_rights: s(
                "Conversor de Medidas. Todos os direitos reservados.",
                "Ring Size Converter. All rights reserved.",
            ),
        }
    }

    /// Overlay the keys of a JSON object onto these labels.
    /// Unknown keys are ignored; a non-object document is an error.
    pub fn with_overrides(self, json: &str) -> Result<Labels, serde_json::Error> {
        let patch: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(patch) = patch else {
            return Err(serde::de::Error::custom("labels must be a JSON object"));
        };
        let mut base = serde_json::to_value(&self)?;
        if let Some(obj) = base.as_object_mut() {
            for (k, v) in patch {
                if obj.contains_key(&k) {
                    obj.insert(k, v);
                }
            }
        }
        serde_json::from_value(base)
    }

    /// Label of the chart toggle button for the given visibility.
    pub fn chart_toggle(&self, visible: bool) -> &str {
        if visible {
            &self.hide_chart
        } else {
            &self.show_chart
        }
    }
}
