#[cfg(all(target_arch = "wasm32", feature = "csr"))]
fn main() {
    site::mount();
}

/// Native builds list the catalog; the panels only run in a browser.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    println!("Browser hook panels (select one with ?{}=<slug>):", site::PANEL_KEY);
    for entry in site::CATALOG {
        println!("  {:<10} {:<52} {}", entry.slug, entry.hooks, entry.summary);
    }
}
