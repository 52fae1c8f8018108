diesel::table! {
    stock_indices (id) {
        id -> BigInt,
        symbol -> Text,
        mean -> Nullable<Double>,
        variance -> Nullable<Double>,
        skew -> Nullable<Double>,
        kurtosis -> Nullable<Double>,
    }
}

diesel::table! {
    stock_index_quotes (value_date, stockindex_id) {
        value -> Double,
        value_date -> Date,
        stockindex_id -> BigInt,
    }
}

diesel::joinable!(stock_index_quotes -> stock_indices (stockindex_id));

diesel::allow_tables_to_appear_in_same_query!(stock_indices, stock_index_quotes);
