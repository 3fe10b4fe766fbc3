use tourney_core::{Identity, PlayerRecord, SortKey};
use yew::prelude::*;

use crate::components::StatsForm;
use crate::form::FormDraft;
use crate::storage::create_web_engine;

/// Root component: owns the engine and the view state derived from it.
#[function_component(App)]
pub fn app() -> Html {
    let engine = use_mut_ref(create_web_engine);
    let roster = use_state(|| engine.borrow().roster().to_vec());
    let applied_sort = use_state(|| None::<SortKey>);
    let selected_sort = use_state(|| engine.borrow().sort_key());
    let draft = use_state(FormDraft::default);
    let message = use_state(|| None::<AttrValue>);
    let editing = use_state(|| None::<Identity>);

    let on_draft = {
        let draft = draft.clone();
        Callback::from(move |next: FormDraft| draft.set(next))
    };

    let on_submit = {
        let engine = engine.clone();
        let roster = roster.clone();
        let draft = draft.clone();
        let message = message.clone();
        let editing = editing.clone();
        let applied_sort = applied_sort.clone();
        Callback::from(move |()| {
            let outcome = draft.to_submission().and_then(|submission| {
                engine
                    .borrow_mut()
                    .submit(&submission)
                    .map(<[PlayerRecord]>::to_vec)
            });
            match outcome {
                Ok(next) => {
                    roster.set(next);
                    applied_sort.set(None);
                    draft.set(FormDraft::default());
                    message.set(None);
                    editing.set(None);
                }
                Err(err) => {
                    log::info!("submission rejected: {err}");
                    message.set(Some(AttrValue::from(err.to_string())));
                }
            }
        })
    };

    let on_sort_change = {
        let selected_sort = selected_sort.clone();
        Callback::from(move |key: SortKey| selected_sort.set(key))
    };

    let on_sort = {
        let engine = engine.clone();
        let roster = roster.clone();
        let applied_sort = applied_sort.clone();
        let selected_sort = selected_sort.clone();
        Callback::from(move |()| {
            let key = *selected_sort;
            let next = engine.borrow_mut().sort_by(key).to_vec();
            roster.set(next);
            applied_sort.set(Some(key));
        })
    };

    let on_edit = {
        let engine = engine.clone();
        let draft = draft.clone();
        let editing = editing.clone();
        let message = message.clone();
        Callback::from(move |index: usize| {
            let started = engine.borrow_mut().begin_edit_at(index);
            if let Some(edit) = started {
                draft.set(FormDraft::from_edit(&edit));
                editing.set(Some(edit.identity));
                message.set(None);
            }
        })
    };

    let on_cancel_edit = {
        let engine = engine.clone();
        let draft = draft.clone();
        let editing = editing.clone();
        Callback::from(move |()| {
            engine.borrow_mut().cancel_edit();
            draft.set(FormDraft::default());
            editing.set(None);
        })
    };

    let on_clear = {
        let engine = engine.clone();
        let roster = roster.clone();
        let editing = editing.clone();
        let message = message.clone();
        Callback::from(move |()| {
            engine.borrow_mut().clear();
            roster.set(Vec::new());
            editing.set(None);
            message.set(None);
        })
    };

    html! {
        <StatsForm
            draft={(*draft).clone()}
            roster={(*roster).clone()}
            sort_key={*selected_sort}
            sorted_by={*applied_sort}
            message={(*message).clone()}
            editing={(*editing).clone()}
            on_draft={on_draft}
            on_submit={on_submit}
            on_sort_change={on_sort_change}
            on_sort={on_sort}
            on_edit={on_edit}
            on_cancel_edit={on_cancel_edit}
            on_clear={on_clear}
        />
    }
}
