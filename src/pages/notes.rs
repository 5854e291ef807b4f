use crate::components::ui::{
    Badge, Button, ButtonSize, ButtonVariant, Card, CardContent, CardFooter, CardHeader, CardItem,
    CardList, CardTitle, ErrorAlert, Input, Label, Spinner, Textarea, Toaster,
};
use crate::models::Note;
use crate::state::{AppContext, AuthStore, NotesStore};
use crate::util::{
    current_hour, empty_list_message, excerpt, greeting_for_hour, note_count_label, EXCERPT_CHARS,
};
use icons::{Pencil, Search, Trash2};
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use leptos_router::hooks::use_navigate;

#[component]
pub fn HomePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let auth = app_state.0.auth;
    let notes = app_state.0.notes;
    let toaster = expect_context::<Toaster>();
    let navigate = StoredValue::new(use_navigate());

    // Editor fields (transient, local to this page).
    let title: RwSignal<String> = RwSignal::new(String::new());
    let content: RwSignal<String> = RwSignal::new(String::new());

    let search_term: RwSignal<String> = RwSignal::new(String::new());
    let pending_delete: RwSignal<Option<String>> = RwSignal::new(None);

    // An expired token is not recoverable here; send the user back to sign in.
    let reauthenticate = move || {
        auth.logout();
        notes.reset();
        toaster.error("Your session has expired. Please login again.");
        navigate.with_value(|nav| nav("/login", Default::default()));
    };

    Effect::new(move |_| {
        spawn_local(async move {
            if let Err(e) = notes.fetch_notes().await {
                if e.is_unauthorized() {
                    reauthenticate();
                }
            }
        });
    });

    let on_edit = Callback::new(move |note: Note| {
        title.set(note.title.clone());
        content.set(note.content.clone());
        notes.set_current_note(note);
        window().scroll_to_with_x_and_y(0.0, 0.0);
    });

    let on_delete = Callback::new(move |id: String| pending_delete.set(Some(id)));

    let greeting = move || {
        let name = auth
            .user()
            .map(|u| u.username)
            .unwrap_or_else(|| "there".to_string());
        format!("Good {}, {}!", greeting_for_hour(current_hour()), name)
    };

    view! {
        <div class="mx-auto w-full max-w-[1080px] px-4 py-8">
            <h1 class="mb-6 text-2xl font-semibold">{greeting}</h1>

            <div class="grid grid-cols-1 gap-6 lg:grid-cols-3">
                <div class="lg:col-span-1">
                    <NoteEditor notes=notes auth=auth title=title content=content />
                </div>
                <div class="lg:col-span-2">
                    <NoteList notes=notes search_term=search_term on_edit=on_edit on_delete=on_delete />
                </div>
            </div>

            <DeleteNoteDialog notes=notes pending_delete=pending_delete />
        </div>
    }
}

#[component]
fn NoteEditor(
    notes: NotesStore,
    auth: AuthStore,
    title: RwSignal<String>,
    content: RwSignal<String>,
) -> impl IntoView {
    let toaster = expect_context::<Toaster>();

    let reset_form = move || {
        title.set(String::new());
        content.set(String::new());
        notes.clear_current_note();
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let title_val = title.get_untracked();
        let content_val = content.get_untracked();
        let editing = notes.current_untracked();
        let editing_id = editing.as_ref().map(|n| n.id.clone());

        spawn_local(async move {
            let saved = match editing {
                Some(note) => notes
                    .update_note(note.id, title_val, content_val)
                    .await
                    .map(|_| "Note updated successfully"),
                None => notes
                    .add_note(title_val, content_val)
                    .await
                    .map(|_| "Note added successfully"),
            };

            match saved {
                Ok(message) => {
                    toaster.success(message);
                    // Leave the form alone if the user picked another note meanwhile.
                    if notes.current_untracked().map(|n| n.id) == editing_id {
                        reset_form();
                    }
                }
                // Keep the user's input; the store error is shown in the list panel.
                Err(e) if e.is_unauthorized() => toaster.error("Please login again to save your note."),
                Err(_) => {}
            }
        });
    };

    let on_cancel = move |ev: web_sys::MouseEvent| {
        // Cancel lives inside the form; keep it from submitting.
        ev.prevent_default();
        reset_form();
    };

    let is_editing = move || notes.current().is_some();

    view! {
        <Card>
            <CardHeader>
                <CardTitle>{move || if is_editing() { "Edit Note" } else { "Add New Note" }}</CardTitle>
            </CardHeader>
            <CardContent>
                <form class="flex flex-col gap-4" on:submit=on_submit>
                    <div class="flex flex-col gap-2">
                        <Label html_for="note_title">"Title"</Label>
                        <Input id="note_title" placeholder="Note title" bind_value=title required=true />
                    </div>

                    <div class="flex flex-col gap-2">
                        <Label html_for="note_content">"Content"</Label>
                        <Textarea
                            id="note_content"
                            placeholder="Note content"
                            rows=5
                            bind_value=content
                            required=true
                        />
                    </div>

                    <div class="flex items-center gap-2">
                        <Button attr:disabled=move || notes.is_loading() || !auth.is_authenticated()>
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || notes.is_loading() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if is_editing() { "Update Note" } else { "Add Note" }}
                            </span>
                        </Button>

                        <Show when=is_editing fallback=|| ().into_view()>
                            <Button variant=ButtonVariant::Outline on:click=on_cancel>
                                "Cancel"
                            </Button>
                        </Show>
                    </div>
                </form>
            </CardContent>
        </Card>
    }
}

#[component]
fn NoteList(
    notes: NotesStore,
    search_term: RwSignal<String>,
    on_edit: Callback<Note>,
    on_delete: Callback<String>,
) -> impl IntoView {
    // Recomputed when either the term or the collection changes.
    let filtered = Memo::new(move |_| search_term.with(|term| notes.filtered(term)));

    let empty_message = move || search_term.with(|term| empty_list_message(term));

    view! {
        <Card>
            <CardHeader class="w-full flex-row items-center justify-between">
                <CardTitle>"Your Notes"</CardTitle>
                <Badge>{move || note_count_label(filtered.with(Vec::len))}</Badge>
            </CardHeader>

            <CardContent class="flex flex-col gap-4">
                <div class="relative">
                    <Search class="absolute left-3 top-2.5 size-4 text-muted-foreground" />
                    <Input class="pl-9" placeholder="Search notes..." bind_value=search_term />
                </div>

                <Show when=move || notes.is_loading() fallback=|| ().into_view()>
                    <div class="flex justify-center py-4">
                        <Spinner class="size-6 text-primary" />
                    </div>
                </Show>

                <ErrorAlert error=Signal::derive(move || notes.error()) />

                <Show when=move || !notes.is_loading() && filtered.with(Vec::is_empty) fallback=|| ().into_view()>
                    <div class="rounded-md border bg-muted p-4 text-center text-sm text-muted-foreground">
                        {empty_message}
                    </div>
                </Show>

                <CardList>
                    {move || {
                        filtered
                            .get()
                            .into_iter()
                            .map(|note| view! { <NoteCard note=note on_edit=on_edit on_delete=on_delete /> })
                            .collect_view()
                    }}
                </CardList>
            </CardContent>
        </Card>
    }
}

#[component]
fn NoteCard(note: Note, on_edit: Callback<Note>, on_delete: Callback<String>) -> impl IntoView {
    let id = note.id.clone();
    let preview = excerpt(&note.content, EXCERPT_CHARS);
    let updated = note.last_update.clone();
    let title = note.title.clone();

    view! {
        <CardItem>
            <div class="flex flex-1 flex-col gap-2 p-4">
                <div class="text-sm font-medium">{title}</div>
                <div class="whitespace-pre-wrap text-xs text-muted-foreground">{preview}</div>
                {updated.map(|ts| view! {
                    <div class="text-[11px] text-muted-foreground">{format!("Updated {ts}")}</div>
                })}
            </div>
            <CardFooter class="justify-end border-t px-4 pt-3 pb-3">
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    on:click=move |_| on_edit.run(note.clone())
                >
                    <Pencil class="size-3.5" />
                    "Edit"
                </Button>
                <Button
                    variant=ButtonVariant::OutlineDestructive
                    size=ButtonSize::Sm
                    on:click=move |_| on_delete.run(id.clone())
                >
                    <Trash2 class="size-3.5" />
                    "Delete"
                </Button>
            </CardFooter>
        </CardItem>
    }
}

#[component]
fn DeleteNoteDialog(notes: NotesStore, pending_delete: RwSignal<Option<String>>) -> impl IntoView {
    let toaster = expect_context::<Toaster>();

    let close = move || pending_delete.set(None);

    let key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" && pending_delete.with_untracked(Option::is_some) {
            ev.prevent_default();
            close();
        }
    });
    on_cleanup(move || key_handle.remove());

    let on_confirm = move |_: web_sys::MouseEvent| {
        let Some(id) = pending_delete.get_untracked() else {
            return;
        };
        close();

        spawn_local(async move {
            if notes.delete_note(id).await.is_ok() {
                toaster.success("Note deleted successfully");
            }
        });
    };

    view! {
        <Show when=move || pending_delete.with(Option::is_some) fallback=|| ().into_view()>
            <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4" on:click=move |_| close()>
                <div
                    class="w-full max-w-sm rounded-md border bg-background p-4 shadow-lg"
                    role="dialog"
                    aria-modal="true"
                    on:click=|ev: web_sys::MouseEvent| ev.stop_propagation()
                >
                    <div class="mb-3 space-y-1">
                        <div class="text-sm font-medium">"Confirm Delete"</div>
                        <div class="text-xs text-muted-foreground">
                            "Are you sure you want to delete this note? This action cannot be undone."
                        </div>
                    </div>

                    <div class="flex items-center justify-end gap-2 pt-2">
                        <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_| close()>
                            "Cancel"
                        </Button>
                        <Button variant=ButtonVariant::Destructive size=ButtonSize::Sm on:click=on_confirm>
                            "Delete"
                        </Button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
