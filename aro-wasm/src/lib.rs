use std::cell::RefCell;
use std::rc::Rc;

use aro_core::{RING_SIZE_CHART, accepts_input, resolve_chart};
use chart_core::{Labels, Lang, build_chart_html, build_chart_svg, build_ring_svg};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlInputElement, Window};

mod clipboard;
mod state;
mod utils;

use state::{AppState, DEFAULT_INPUT, STATE, State};
use utils::{get_query_param, html_element, log, save_text_as_file, set_hidden, set_text};

/// How long the "copied" confirmation stays visible (ms).
const COPIED_RESET_MS: i32 = 2000;

/// Initial text for the diameter field: the `d` query parameter when the
/// input filter accepts it, otherwise the default.
fn initial_input(param: Option<&str>) -> String {
    match param {
        Some(p) if accepts_input(p) => p.to_string(),
        _ => DEFAULT_INPUT.to_string(),
    }
}

fn lang_attr(lang: Lang) -> &'static str {
    match lang {
        Lang::Pt => "pt-BR",
        Lang::En => "en",
    }
}

// Static texts; only change with the language.
fn render_labels(state: &State) {
    let doc = &state.document;
    let l = &state.labels;
    set_text(doc, "title", &l.title);
    set_text(doc, "subtitle", &l.subtitle);
    set_text(doc, "diameterLabel", &l.input_label);
    set_text(doc, "resultHeading", &l.result_heading);
    set_text(doc, "exportSvg", &l.export_chart);
    set_text(doc, "footerNote", &l.footer_note);
    let year = js_sys::Date::new_0().get_full_year();
    set_text(doc, "footerRights", &format!("© {} {}", year, l.footer_rights));
    if let Some(el) = doc.get_element_by_id("diameter") {
        let _ = el.set_attribute("placeholder", &l.placeholder);
    }
    if let Some(el) = html_element(doc, "clearBtn") {
        el.set_inner_text(&l.clear);
        let _ = el.set_attribute("aria-label", &l.clear_aria);
    }
    if let Some(root) = doc.document_element() {
        let _ = root.set_attribute("lang", lang_attr(state.app.lang));
    }
}

fn render(state: &State) {
    let doc = &state.document;
    let app = &state.app;
    let labels = &state.labels;

    if let Some(el) = doc.get_element_by_id("diameter")
        && let Ok(input) = el.dyn_into::<HtmlInputElement>()
        && input.value() != app.input
    {
        input.set_value(&app.input);
    }
    set_hidden(doc, "clearBtn", !app.show_clear());

    if let Some(el) = html_element(doc, "result") {
        el.set_inner_text(&app.result.display());
        let _ = el.set_attribute("data-valid", if app.result.is_valid { "true" } else { "false" });
    }
    if let Some(el) = doc.get_element_by_id("ringVisual") {
        el.set_inner_html(&build_ring_svg(app.diameter_for_display()));
    }

    if let Some(el) = html_element(doc, "chartToggle") {
        el.set_inner_text(labels.chart_toggle(app.chart_visible));
        let _ = el.set_attribute(
            "aria-expanded",
            if app.chart_visible { "true" } else { "false" },
        );
    }
    if let Some(el) = html_element(doc, "chart") {
        if app.chart_visible {
            el.set_inner_html(&build_chart_html(RING_SIZE_CHART, labels));
        } else {
            el.set_inner_html("");
        }
        el.set_hidden(!app.chart_visible);
    }

    if let Some(el) = html_element(doc, "copyBtn") {
        el.set_inner_text(if app.copied { &labels.copied } else { &labels.copy });
        let _ = if app.copy_text().is_some() {
            el.remove_attribute("disabled")
        } else {
            el.set_attribute("disabled", "")
        };
    }
}

fn schedule_copied_reset(window: &Window, state: Rc<RefCell<State>>, ticket: u32) {
    let cb = Closure::once_into_js(move || {
        let mut s = state.borrow_mut();
        s.app.reset_copied(ticket);
        render(&s);
    });
    if let Err(e) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), COPIED_RESET_MS)
    {
        log(&format!("Failed to schedule copy reset: {:?}", e));
    }
}

fn copy_result(state: Rc<RefCell<State>>) {
    let (window, text) = {
        let s = state.borrow();
        (s.window.clone(), s.app.copy_text())
    };
    let Some(text) = text else {
        return;
    };
    // Fire-and-forget; a failure only means no confirmation is shown.
    wasm_bindgen_futures::spawn_local(async move {
        match clipboard::write_text(&window, &text).await {
            Ok(()) => {
                let ticket = {
                    let mut s = state.borrow_mut();
                    let t = s.app.mark_copied();
                    render(&s);
                    t
                };
                schedule_copied_reset(&window, state, ticket);
            }
            Err(e) => log(&format!("Failed to copy to clipboard: {:?}", e)),
        }
    });
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc: Document = state.borrow().document.clone();

    // Diameter field: filtered edits, recompute on every change
    if let Some(el) = doc.get_element_by_id("diameter") {
        let input: HtmlInputElement = el.dyn_into()?;
        let st = state.clone();
        let input_for_closure = input.clone();
        let oninput = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            let v = input_for_closure.value();
            if !s.app.set_input(&v) {
                // restore the last accepted text
                input_for_closure.set_value(&s.app.input);
            }
            render(&s);
        }));
        input.set_oninput(Some(oninput.as_ref().unchecked_ref()));
        oninput.forget();
    }

    if let Some(btn) = html_element(&doc, "clearBtn") {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            s.app.clear();
            render(&s);
            if let Some(el) = html_element(&s.document, "diameter") {
                let _ = el.focus();
            }
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    if let Some(btn) = html_element(&doc, "chartToggle") {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            s.app.toggle_chart();
            render(&s);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    if let Some(btn) = html_element(&doc, "copyBtn") {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            copy_result(st.clone());
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // Export the printable chart (SVG)
    if let Some(btn) = html_element(&doc, "exportSvg") {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let s = st.borrow();
            let (svg, _, _) =
                build_chart_svg(RING_SIZE_CHART, &s.labels, chart_core::DEFAULT_ROW_PX);
            if let Err(e) = save_text_as_file(&s.document, "aro_chart.svg", "image/svg+xml", &svg)
            {
                log(&format!("Failed to export chart: {:?}", e));
            }
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // Language selector
    if let Some(el) = doc.get_element_by_id("langSel") {
        let sel: web_sys::HtmlSelectElement = el.dyn_into()?;
        sel.set_value(state.borrow().app.lang.code());
        let st = state.clone();
        let sel_for_closure = sel.clone();
        let onchange = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            s.set_lang(Lang::parse(&sel_for_closure.value()));
            render_labels(&s);
            render(&s);
        }));
        sel.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();
    }
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    let search = window.location().search().unwrap_or_default();
    let lang = get_query_param(&search, "lang")
        .map(|l| Lang::parse(&l))
        .unwrap_or_default();
    let initial = initial_input(get_query_param(&search, "d").as_deref());

    let mut app = AppState::new(&initial);
    app.lang = lang;
    let state = Rc::new(RefCell::new(State {
        window,
        document,
        app,
        labels: Labels::for_lang(lang),
    }));

    STATE.with(|st| st.replace(Some(state.clone())));
    attach_ui(state.clone())?;
    {
        let s = state.borrow();
        render_labels(&s);
        render(&s);
    }
    Ok(())
}

/// Resolve a diameter string against the built-in chart; returns the result as JSON.
#[wasm_bindgen]
pub fn resolve_diameter(input: &str) -> String {
    serde_json::to_string(&resolve_chart(input)).unwrap_or_default()
}

#[wasm_bindgen]
pub fn reference_table_json() -> String {
    serde_json::to_string(RING_SIZE_CHART).unwrap_or_default()
}

/// Snapshot of the running converter, if started.
#[wasm_bindgen]
pub fn app_state_json() -> Option<String> {
    STATE.with(|st| {
        st.borrow()
            .as_ref()
            .and_then(|rc| serde_json::to_string(&rc.borrow().app).ok())
    })
}
