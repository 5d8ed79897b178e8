use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TextFieldProps {
    pub id: AttrValue,
    pub value: AttrValue,
    pub oninput: Callback<String>,
    #[prop_or(AttrValue::Static("text"))]
    pub input_type: AttrValue,
    #[prop_or_default]
    pub placeholder: Option<AttrValue>,
    /// Inline message shown under the input.
    #[prop_or_default]
    pub error: Option<AttrValue>,
}

#[function_component(TextField)]
pub fn text_field(props: &TextFieldProps) -> Html {
    let on_input = {
        let oninput = props.oninput.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            oninput.emit(input.value());
        })
    };

    let class = if props.error.is_some() {
        "form-group has-error"
    } else {
        "form-group"
    };

    html! {
        <div {class}>
            <input
                type={props.input_type.clone()}
                id={props.id.clone()}
                value={props.value.clone()}
                placeholder={props.placeholder.clone()}
                autocapitalize="none"
                autocomplete="off"
                oninput={on_input}
            />
            if let Some(ref error) = props.error {
                <p class="field-error">{ &**error }</p>
            }
        </div>
    }
}
