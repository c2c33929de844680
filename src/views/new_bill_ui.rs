pub const EXPENSE_TYPES: [&str; 7] = [
    "Transports",
    "Restaurants et bars",
    "Hôtel et logement",
    "Services en ligne",
    "IT et électronique",
    "Equipement et matériel",
    "Fournitures de bureau",
];

pub fn new_bill_ui() -> String {
    let options: String = EXPENSE_TYPES
        .iter()
        .map(|kind| format!("<option>{}</option>", html_escape::encode_text(kind)))
        .collect();

    format!(
        r#"<div class="layout"><div class="content"><div class="content-header"><div class="content-title">Envoyer une note de frais</div></div><div class="form-newbill-container content-inner"><form data-testid="form-new-bill"><label for="expense-type">Type de dépense</label><select required class="form-control blue-border" data-testid="expense-type">{options}</select><label for="expense-name">Nom de la dépense</label><input type="text" class="form-control blue-border" data-testid="expense-name" placeholder="Vol Paris Londres" /><label for="datepicker">Date</label><input required type="date" class="form-control blue-border" data-testid="datepicker" /><label for="amount">Montant TTC</label><input required type="number" class="form-control blue-border input-icon input-icon-right" data-testid="amount" placeholder="348" /><label for="vat">TVA</label><input type="number" class="form-control blue-border" data-testid="vat" placeholder="70" /><input type="number" class="form-control blue-border" data-testid="pct" placeholder="20" /><label for="commentary">Commentaire</label><textarea class="form-control blue-border" data-testid="commentary" rows="3"></textarea><label for="file">Justificatif</label><input required type="file" accept=".jpg,.jpeg,.png" class="form-control blue-border" data-testid="file" /><button type="submit" id="btn-send-bill" class="btn btn-primary">Envoyer</button></form></div></div></div>"#
    )
}
