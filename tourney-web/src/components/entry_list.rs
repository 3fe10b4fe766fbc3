use tourney_core::StatField;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::form::{field_heading, field_noun};

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub field: StatField,
    pub entries: Vec<String>,
    pub on_add: Callback<StatField>,
    pub on_remove: Callback<(StatField, usize)>,
    pub on_input: Callback<(StatField, usize, String)>,
}

/// One growable list of numeric inputs (kills, damage or accuracy).
#[function_component(EntryList)]
pub fn entry_list(p: &Props) -> Html {
    let field = p.field;
    let noun = field_noun(field);
    let section_id = format!("{field}-entries");

    let add = {
        let cb = p.on_add.clone();
        Callback::from(move |_: MouseEvent| cb.emit(field))
    };

    let rows = p.entries.iter().enumerate().map(|(index, value)| {
        let on_input = {
            let cb = p.on_input.clone();
            Callback::from(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                cb.emit((field, index, input.value()));
            })
        };
        let remove = {
            let cb = p.on_remove.clone();
            Callback::from(move |_: MouseEvent| cb.emit((field, index)))
        };
        let placeholder = format!("{noun} {}", index + 1);
        html! {
            <div class="entry-row" key={index.to_string()}>
                <input
                    type="number"
                    class="input"
                    placeholder={placeholder.clone()}
                    aria-label={placeholder}
                    value={value.clone()}
                    oninput={on_input}
                />
                <button type="button" class="btn btn-ghost" onclick={remove}>{ "Remove" }</button>
            </div>
        }
    });

    html! {
        <section class="entry-list" id={section_id}>
            <h2>{ field_heading(field) }</h2>
            { for rows }
            <button type="button" class="btn" onclick={add}>{ format!("Add {noun}") }</button>
        </section>
    }
}
