use tourney_core::SortKey;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub selected: SortKey,
    pub on_change: Callback<SortKey>,
    pub on_sort: Callback<()>,
}

#[function_component(SortControls)]
pub fn sort_controls(p: &Props) -> Html {
    let on_change = {
        let cb = p.on_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(key) = select.value().parse::<SortKey>() {
                cb.emit(key);
            }
        })
    };
    let on_sort = {
        let cb = p.on_sort.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    html! {
        <div class="sort-controls">
            <label for="sort-key">{ "Sort: " }</label>
            <select id="sort-key" class="select" onchange={on_change}>
                { for SortKey::ALL.iter().map(|key| html! {
                    <option value={key.as_str()} selected={*key == p.selected}>{ key.label() }</option>
                }) }
            </select>
            <button type="button" class="btn" onclick={on_sort}>{ "Sort" }</button>
        </div>
    }
}
