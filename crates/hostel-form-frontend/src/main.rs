use hostel_form::platform::browser;

fn main() {
    if let Err(error) = browser::mount_page_on_dom_ready() {
        wasm_bindgen::throw_val(error);
    }
}
