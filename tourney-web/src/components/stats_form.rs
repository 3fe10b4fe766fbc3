use tourney_core::{Identity, PlayerRecord, SortKey, StatField};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::entry_list::EntryList;
use super::leaderboard::Leaderboard;
use super::sort_controls::SortControls;
use crate::form::{FIELDS, FormDraft};

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub draft: FormDraft,
    pub roster: Vec<PlayerRecord>,
    /// Key shown in the sort picker.
    pub sort_key: SortKey,
    /// Key the roster is currently ordered by, if any.
    #[prop_or_default]
    pub sorted_by: Option<SortKey>,
    #[prop_or_default]
    pub message: Option<AttrValue>,
    #[prop_or_default]
    pub editing: Option<Identity>,
    pub on_draft: Callback<FormDraft>,
    pub on_submit: Callback<()>,
    pub on_sort_change: Callback<SortKey>,
    pub on_sort: Callback<()>,
    pub on_edit: Callback<usize>,
    pub on_cancel_edit: Callback<()>,
    pub on_clear: Callback<()>,
}

fn text_input_handler(
    draft: &FormDraft,
    on_draft: &Callback<FormDraft>,
    apply: fn(&mut FormDraft, String),
) -> Callback<InputEvent> {
    let draft = draft.clone();
    let cb = on_draft.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let mut next = draft.clone();
        apply(&mut next, input.value());
        cb.emit(next);
    })
}

/// The whole assistant page: input form, validation message and leaderboard.
#[function_component(StatsForm)]
pub fn stats_form(p: &Props) -> Html {
    let on_player = text_input_handler(&p.draft, &p.on_draft, |d, v| d.player_name = v);
    let on_clan = text_input_handler(&p.draft, &p.on_draft, |d, v| d.clan_name = v);
    let on_events = text_input_handler(&p.draft, &p.on_draft, |d, v| d.events = v);

    let on_submit = {
        let cb = p.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            cb.emit(());
        })
    };
    let on_cancel = {
        let cb = p.on_cancel_edit.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let on_clear = {
        let cb = p.on_clear.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    let on_add = {
        let draft = p.draft.clone();
        let cb = p.on_draft.clone();
        Callback::from(move |field: StatField| {
            let mut next = draft.clone();
            next.add_entry(field);
            cb.emit(next);
        })
    };
    let on_remove = {
        let draft = p.draft.clone();
        let cb = p.on_draft.clone();
        Callback::from(move |(field, index): (StatField, usize)| {
            let mut next = draft.clone();
            next.remove_entry(field, index);
            cb.emit(next);
        })
    };
    let on_entry_input = {
        let draft = p.draft.clone();
        let cb = p.on_draft.clone();
        Callback::from(move |(field, index, value): (StatField, usize, String)| {
            let mut next = draft.clone();
            next.set_entry(field, index, value);
            cb.emit(next);
        })
    };

    let lists = FIELDS.iter().map(|field| {
        html! {
            <EntryList
                key={field.to_string()}
                field={*field}
                entries={p.draft.entries(*field).to_vec()}
                on_add={on_add.clone()}
                on_remove={on_remove.clone()}
                on_input={on_entry_input.clone()}
            />
        }
    });

    let editing_banner = p.editing.as_ref().map(|identity| {
        html! {
            <div class="alert alert-info editing-banner" role="status">
                <span>{ format!("Adding events to {identity}") }</span>
                <button type="button" class="btn btn-ghost" onclick={on_cancel.clone()}>{ "Cancel edit" }</button>
            </div>
        }
    });

    let message = p.message.as_ref().map(|text| {
        html! { <div class="alert alert-error" role="alert">{ text.clone() }</div> }
    });

    html! {
        <main id="main" class="tourney-assistant">
            <h1>{ "ABC Tourney Assistant" }</h1>
            { for editing_banner }
            <form class="stats-form" onsubmit={on_submit}>
                <input
                    type="text"
                    class="input"
                    placeholder="Player name"
                    aria-label="Player name"
                    value={p.draft.player_name.clone()}
                    oninput={on_player}
                />
                <input
                    type="text"
                    class="input"
                    placeholder="Clan Name"
                    aria-label="Clan Name"
                    value={p.draft.clan_name.clone()}
                    oninput={on_clan}
                />
                { for lists }
                <section class="events-input">
                    <h2>{ "Events" }</h2>
                    <input
                        type="number"
                        class="input"
                        placeholder="Number of Events"
                        aria-label="Number of Events"
                        value={p.draft.events.clone()}
                        oninput={on_events}
                    />
                </section>
                { for message }
                <button type="submit" class="btn btn-primary">{ "Submit" }</button>
            </form>

            <h2>{ "Player Statistics" }</h2>
            <SortControls
                selected={p.sort_key}
                on_change={p.on_sort_change.clone()}
                on_sort={p.on_sort.clone()}
            />
            <Leaderboard
                roster={p.roster.clone()}
                sorted_by={p.sorted_by}
                editing={p.editing.clone()}
                on_edit={p.on_edit.clone()}
            />
            <button type="button" class="btn btn-warning" onclick={on_clear}>{ "Clear all" }</button>
        </main>
    }
}
