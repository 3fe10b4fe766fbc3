use tourney_core::{Identity, PlayerRecord, SortKey};
use yew::prelude::*;

const COLUMNS: [SortKey; 7] = [
    SortKey::PlayerName,
    SortKey::ClanName,
    SortKey::TotalKills,
    SortKey::KillsPerEvent,
    SortKey::AverageDamage,
    SortKey::AverageAccuracy,
    SortKey::Events,
];

/// Cell text for one column of a record.
#[must_use]
pub fn cell_text(record: &PlayerRecord, column: SortKey) -> String {
    match column {
        SortKey::PlayerName => record.player_name.clone(),
        SortKey::ClanName => record.clan_name.clone(),
        SortKey::TotalKills => record.total_kills.to_string(),
        SortKey::KillsPerEvent => format!("{:.2}", record.kills_per_event),
        SortKey::AverageDamage => format!("{:.2}", record.average_damage),
        SortKey::AverageAccuracy => format!("{:.2}", record.average_accuracy),
        SortKey::Events => record.events.to_string(),
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub roster: Vec<PlayerRecord>,
    /// Column the rows are currently ordered by. `None` once a submit changes the order.
    #[prop_or_default]
    pub sorted_by: Option<SortKey>,
    #[prop_or_default]
    pub editing: Option<Identity>,
    pub on_edit: Callback<usize>,
}

#[function_component(Leaderboard)]
pub fn leaderboard(p: &Props) -> Html {
    if p.roster.is_empty() {
        return html! {
            <p class="muted leaderboard-empty">{ "No players recorded yet." }</p>
        };
    }

    let rows = p.roster.iter().enumerate().map(|(index, record)| {
        let on_edit = {
            let cb = p.on_edit.clone();
            Callback::from(move |_: MouseEvent| cb.emit(index))
        };
        let is_editing = p.editing.as_ref().is_some_and(|id| record.matches(id));
        html! {
            <tr class={classes!(is_editing.then_some("row-editing"))}>
                { for COLUMNS.iter().map(|column| html! { <td>{ cell_text(record, *column) }</td> }) }
                <td>
                    <button type="button" class="btn btn-sm" onclick={on_edit}>{ "Edit" }</button>
                </td>
            </tr>
        }
    });

    html! {
        <div class="overflow-x-auto">
            <table class="table table-zebra w-full leaderboard" role="table">
                <thead>
                    <tr>
                        { for COLUMNS.iter().map(|column| {
                            let sorted = p.sorted_by == Some(*column);
                            html! {
                                <th scope="col" aria-sort={if sorted { "descending" } else { "none" }}>
                                    { column.label() }
                                </th>
                            }
                        }) }
                        <th scope="col"><span class="sr-only">{ "Actions" }</span></th>
                    </tr>
                </thead>
                <tbody>
                    { for rows }
                </tbody>
            </table>
        </div>
    }
}
