use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, HtmlElement, Url};

/// Log a message to the browser console.
pub fn log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

/// Look up an element by id as an `HtmlElement`.
pub fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

pub fn set_text(document: &Document, id: &str, text: &str) {
    if let Some(el) = html_element(document, id) {
        el.set_inner_text(text);
    }
}

pub fn set_hidden(document: &Document, id: &str, hidden: bool) {
    if let Some(el) = html_element(document, id) {
        el.set_hidden(hidden);
    }
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    let decoded = percent_encoding::percent_decode_str(&s)
        .decode_utf8()
        .map(|c| c.into_owned());
    decoded.unwrap_or(s)
}

/// Offer `text` to the user as a file download.
pub fn save_text_as_file(
    document: &Document,
    filename: &str,
    mime: &str,
    text: &str,
) -> Result<(), JsValue> {
    let array = Array::new();
    array.push(&JsValue::from_str(text));
    let opts = BlobPropertyBag::new();
    opts.set_type(mime);
    let blob = Blob::new_with_str_sequence_and_options(&array, &opts)?;
    let url = Url::create_object_url_with_blob(&blob)?;
    let a = document.create_element("a")?.dyn_into::<HtmlElement>()?;
    a.set_attribute("href", &url)?;
    a.set_attribute("download", filename)?;
    a.click();
    Url::revoke_object_url(&url)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_param_lookup() {
        assert_eq!(get_query_param("?d=16.5&lang=en", "d").as_deref(), Some("16.5"));
        assert_eq!(get_query_param("?d=16.5&lang=en", "lang").as_deref(), Some("en"));
        assert_eq!(get_query_param("?flag", "flag").as_deref(), Some(""));
        assert_eq!(get_query_param("", "d"), None);
        assert_eq!(get_query_param("?x=1", "d"), None);
    }

    #[test]
    fn query_values_are_decoded() {
        assert_eq!(get_query_param("?d=16%2C5", "d").as_deref(), Some("16,5"));
        assert_eq!(get_query_param("?lang=pt%2DBR", "lang").as_deref(), Some("pt-BR"));
        assert_eq!(get_query_param("?t=a+b", "t").as_deref(), Some("a b"));
    }
}
