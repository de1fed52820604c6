use leptos::*;
use std::rc::Rc;

use crate::core::config::Config;
use crate::core::presets::Preset;
use crate::core::session::Session;
use crate::services::scenario::ScenarioGenerator;
use crate::services::speech::{Speaker, WebSpeaker};

#[component]
pub fn App() -> impl IntoView {
    let config = Config::from_build_env();
    let session = create_rw_signal(Session::new());
    let speaker: Rc<dyn Speaker> = Rc::new(WebSpeaker::new(&config.story.voice_lang));

    // Speak on every episode change, including the first one after generation.
    let current_script = create_memo(move |_| {
        session.with(|s| s.current_episode().map(|e| (s.episode_index(), e.script.clone())))
    });
    {
        let speaker = speaker.clone();
        create_effect(move |_| {
            if let Some((_, script)) = current_script.get() {
                if let Err(e) = speaker.speak(&script) {
                    log::error!("Failed to speak episode: {:?}", e);
                }
            }
        });
    }

    let on_generate = Callback::new(move |_: ()| {
        let premise = match session.try_update(|s| s.begin_generation()) {
            Some(Ok(premise)) => premise,
            Some(Err(e)) => {
                log::warn!("{}", e);
                return;
            }
            None => return,
        };

        let generator = match ScenarioGenerator::from_config(&config) {
            Ok(generator) => generator,
            Err(e) => {
                log::error!("{:#}", e);
                session.update(|s| s.fail_generation(format!("{:#}", e)));
                return;
            }
        };

        spawn_local(async move {
            match generator.generate(&premise).await {
                Ok(episodes) => session.update(|s| {
                    if let Err(e) = s.finish_generation(episodes) {
                        log::error!("{}", e);
                    }
                }),
                Err(e) => {
                    log::error!("Scenario generation failed: {:#}", e);
                    session.update(|s| s.fail_generation(format!("{:#}", e)));
                }
            }
        });
    });

    let has_episodes = create_memo(move |_| session.with(|s| s.episodes().is_some()));

    view! {
        <div class="App">
            <div class="App-header">
                {move || if has_episodes.get() {
                    view! { <EpisodeViewer session=session speaker=speaker.clone()/> }.into_view()
                } else {
                    view! { <PromptScreen session=session on_generate=on_generate/> }.into_view()
                }}
            </div>
        </div>
    }
}

#[component]
fn PromptScreen(session: RwSignal<Session>, on_generate: Callback<()>) -> impl IntoView {
    let loading = create_memo(move |_| session.with(Session::is_loading));
    let input = create_memo(move |_| session.with(|s| s.input().to_string()));
    let error = create_memo(move |_| session.with(|s| s.error().map(str::to_string)));

    view! {
        <h3>"Netflix GPT"</h3>
        <p>"Ask me a story and I will generate a short audio serie"</p>
        <div>
            {Preset::ALL
                .into_iter()
                .map(|preset| view! {
                    <button
                        disabled=move || loading.get()
                        on:click=move |_| session.update(|s| s.apply_preset(preset))
                    >
                        {preset.label()}
                    </button>
                })
                .collect_view()}
        </div>
        <textarea
            placeholder="Ask me a story"
            prop:value=move || input.get()
            on:input=move |ev| session.update(|s| s.set_input(event_target_value(&ev)))
            cols="40"
            rows="5"
        ></textarea>
        <button disabled=move || loading.get() on:click=move |_| on_generate.call(())>
            "generate"
        </button>
        <Show when=move || loading.get()>
            <div class="loader"></div>
        </Show>
        {move || error.get().map(|e| view! { <p class="error">{e}</p> })}
    }
}

#[component]
fn EpisodeViewer(session: RwSignal<Session>, speaker: Rc<dyn Speaker>) -> impl IntoView {
    let can_go_back = create_memo(move |_| session.with(Session::can_go_back));
    let can_go_forward = create_memo(move |_| session.with(Session::can_go_forward));
    let number = create_memo(move |_| session.with(Session::episode_number));
    let episode = create_memo(move |_| session.with(|s| s.current_episode().cloned()));

    let on_stop = move |_| {
        if let Err(e) = speaker.cancel() {
            log::error!("Failed to stop speaking: {:?}", e);
        }
    };

    view! {
        <h3>
            <div>
                <button
                    disabled=move || !can_go_back.get()
                    on:click=move |_| { session.update(|s| { s.previous(); }); }
                >
                    "<-"
                </button>
                "Episode " {move || number.get()}
                <button
                    disabled=move || !can_go_forward.get()
                    on:click=move |_| { session.update(|s| { s.next(); }); }
                >
                    "->"
                </button>
            </div>
        </h3>
        <p>{move || episode.get().map(|e| e.script)}</p>
        <img src=move || episode.get().map(|e| e.image_url).unwrap_or_default() alt="illustration"/>
        <button on:click=on_stop style="margin-top: 50px">"stop speaking"</button>
        <button on:click=move |_| session.update(Session::regenerate) style="margin-top: 25px">
            "regenerate"
        </button>
    }
}
