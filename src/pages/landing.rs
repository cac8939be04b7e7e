use yew::prelude::*;

use crate::config::FxConfig;
use crate::fx::LandingFx;
use crate::pages::content::{CLIENTS, NAV_LINKS, PACKAGES, TESTIMONIALS};

#[function_component(Landing)]
pub fn landing() -> Html {
    // Effects attach once the markup is in the document and detach on unmount.
    {
        use_effect_with_deps(
            move |_| {
                let config = web_sys::window()
                    .and_then(|window| window.document())
                    .map(|document| FxConfig::from_document(&document))
                    .unwrap_or_default();
                let fx = LandingFx::init(&config);
                move || fx.teardown()
            },
            (),
        );
    }

    html! {
        <div class="landing">
            <header class="site-header">
                <a class="header-logo" href="#top">{"Riddim Room"}</a>
                <nav class="header-nav">
                    { for NAV_LINKS.iter().map(|link| html! {
                        <a class="header-link" href={link.href}>{link.label}</a>
                    }) }
                </nav>
            </header>

            <section class="hero" id="top">
                <div class="hero-copy">
                    <div class="hero-ragga-font-container">
                        <span class="hero-ragga-font">{"Mix. Master. Riddim."}</span>
                    </div>
                    <h1 class="hero-title-name">{"Riddim Room"}</h1>
                    <p class="hero-lead">{"Mixing and mastering for reggae, dancehall and dub, from a studio built around the bass."}</p>
                    <div class="card-divider-blue"></div>
                    <p class="hero-lead-highlight-sub">{"Analog chain, digital recall, human ears."}</p>
                    <div class="hero-actions">
                        <a class="button button-primary" href="#packages">{"See packages"}</a>
                        <a class="button button-ghost" href="#contact">{"Get in touch"}</a>
                    </div>
                </div>
                <div class="hero-media">
                    <img src="/assets/hero-console.jpg" alt="Mixing console in the studio" />
                </div>
            </section>

            <section class="about" id="about">
                <h2 class="section-title">{"About"}</h2>
                <div class="about-content">
                    <p>{"Fifteen years of sound system culture condensed into one room. Every record is treated for the club and the car alike."}</p>
                </div>
            </section>

            <section class="packages" id="packages">
                <h2 class="section-title">{"Packages"}</h2>
                <div class="packages-ragga-container">
                    <span class="packages-ragga-font">{"Pick your riddim"}</span>
                </div>
                <div class="package-grid">
                    { for PACKAGES.iter().map(|package| html! {
                        <article class={classes!("card", package.popular.then_some("card-popular"))}>
                            if package.popular {
                                <span class="card-badge">{"Most popular"}</span>
                            }
                            <h3 class="card-title">{package.name}</h3>
                            <p class="card-price">{package.price}</p>
                            <p class="card-blurb">{package.blurb}</p>
                            <ul class="card-features">
                                { for package.features.iter().map(|feature| html! { <li>{*feature}</li> }) }
                            </ul>
                        </article>
                    }) }
                </div>
                <div class="carousel-dots"></div>
            </section>

            <section class="clients" id="clients">
                <h2 class="section-title">{"Clients"}</h2>
                <div class="client-carousel">
                    <button class="carousel-arrow prev" aria-label="Previous client">{"‹"}</button>
                    <div class="client-carousel-track">
                        { for CLIENTS.iter().map(|client| html! {
                            <div class="client-slide">
                                <img src={client.logo} alt={client.name} draggable="false" />
                            </div>
                        }) }
                    </div>
                    <button class="carousel-arrow next" aria-label="Next client">{"›"}</button>
                </div>
                <div class="clients-dots"></div>
            </section>

            <section class="testimonials">
                <h2 class="section-title">{"What artists say"}</h2>
                <div class="testimonial-media">
                    { for TESTIMONIALS.iter().map(|testimonial| html! {
                        <blockquote class="testimonial">
                            <p>{testimonial.quote}</p>
                            <footer>{testimonial.author}{", "}{testimonial.role}</footer>
                        </blockquote>
                    }) }
                </div>
            </section>

            <section class="contact" id="contact">
                <h2 class="section-title">{"Contact"}</h2>
                <div class="contact-card">
                    <p>{"Send a rough mix and a reference track, we answer within two days."}</p>
                    <a class="button button-primary" href="mailto:studio@riddimroom.example">{"studio@riddimroom.example"}</a>
                </div>
            </section>
        </div>
    }
}
